use std::io;
use crate::config::config::ImageFormat;
use crate::models::conversion::ConversionOutcome;

// 應用配置結構體，封裝所有參數
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub folder: String,
    pub source_format: ImageFormat,
    pub target_format: ImageFormat,
    pub replace_originals: bool,
    pub no_progress: bool,
    pub log_level: String,
    pub magick_binary: String,
}

// 配置來源的 Port
pub trait ConfigPort {
    fn get_config(&self) -> io::Result<AppConfig>;
}

// 轉換執行的 Port
pub trait ConversionPort {
    fn execute(&self, config: AppConfig) -> io::Result<ConversionOutcome>;
}
