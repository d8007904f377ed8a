use dialoguer::{Confirm, Input, Select};
use std::io;
use std::path::Path;

use crate::config::config::{ImageFormat, DEFAULT_MAGICK_BINARY};
use crate::config::ports::{AppConfig, ConfigPort, ConversionPort};
use crate::models::conversion::ConversionOutcome;
use crate::service::config_service::ConfigService;
use crate::utils::convert::ConversionAdapter;
use crate::utils::utils::setup_logging;

pub fn process_interactive_mode() -> io::Result<ConversionOutcome> {
    println!("=== 歡迎使用圖片格式轉換互動模式 ===");
    let folder = get_folder_path()?;

    let config_service = ConfigService::new(Box::new(InteractiveConfigAdapter::new(folder)));
    let config = config_service.get_config()?;

    let conversion_port: Box<dyn ConversionPort> = Box::new(ConversionAdapter);
    conversion_port.execute(config)
}

pub fn get_folder_path() -> io::Result<String> {
    Input::new()
        .with_prompt("請輸入圖片所在的資料夾路徑（例如：./photos）")
        .validate_with(|input: &String| -> Result<(), String> {
            if Path::new(input).is_dir() { Ok(()) } else { Err(format!("資料夾 '{}' 不存在", input)) }
        })
        .interact_text()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))
}

pub fn format_items() -> Vec<String> {
    ImageFormat::all().iter().map(|f| f.to_string()).collect()
}

pub fn get_format(prompt: &str, default: usize) -> io::Result<ImageFormat> {
    let formats = ImageFormat::all();
    let index = Select::new()
        .with_prompt(prompt)
        .items(&format_items())
        .default(default)
        .interact()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("格式選擇失敗: {}", e)))?;
    Ok(formats[index])
}

pub fn get_replace_option() -> io::Result<bool> {
    Confirm::new()
        .with_prompt("轉換成功後是否刪除原始圖片？")
        .default(false)
        .interact()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("取代選項輸入失敗: {}", e)))
}

// 交互配置適配器
pub struct InteractiveConfigAdapter {
    folder: String,
}

impl InteractiveConfigAdapter {
    pub fn new(folder: String) -> Self {
        InteractiveConfigAdapter { folder }
    }
}

impl ConfigPort for InteractiveConfigAdapter {
    fn get_config(&self) -> io::Result<AppConfig> {
        let source_format = get_format("選擇輸入格式（使用方向鍵選擇，按 Enter 確認）", 0)?;
        let target_format = get_format("選擇輸出格式（使用方向鍵選擇，按 Enter 確認）", 2)?;
        let replace_originals = get_replace_option()?;
        let log_level = "info".to_string();

        setup_logging(&log_level)?;

        Ok(AppConfig {
            folder: self.folder.clone(),
            source_format,
            target_format,
            replace_originals,
            no_progress: false,
            log_level,
            magick_binary: DEFAULT_MAGICK_BINARY.to_string(),
        })
    }
}
