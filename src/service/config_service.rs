use std::io;
use crate::config::ports::{AppConfig, ConfigPort};

// 配置服務，包裝所選的配置適配器
pub struct ConfigService {
    config_port: Box<dyn ConfigPort>,
}

impl ConfigService {
    pub fn new(config_port: Box<dyn ConfigPort>) -> Self {
        ConfigService { config_port }
    }

    pub fn get_config(&self) -> io::Result<AppConfig> {
        let config = self.config_port.get_config()?;
        log::info!(
            "配置：資料夾={}, 來源={}, 目標={}, 取代原檔={}",
            config.folder, config.source_format, config.target_format, config.replace_originals
        );
        Ok(config)
    }
}
