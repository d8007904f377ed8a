use std::io;
use clap::Parser;
use crate::config::config::{Cli, validate_folder_path};
use crate::action::interactive::process_interactive_mode;
use crate::utils::utils::setup_logging;
use crate::config::ports::{AppConfig, ConfigPort, ConversionPort};
use crate::models::conversion::ConversionOutcome;
use crate::service::config_service::ConfigService;
use crate::utils::convert::ConversionAdapter;

pub fn process_args(args: Vec<String>) -> io::Result<ConversionOutcome> {
    if args.len() == 1 {
        process_interactive_mode()
    } else {
        process_cli_mode()
    }
}

pub fn process_cli_mode() -> io::Result<ConversionOutcome> {
    let cli = Cli::parse();
    setup_logging(&cli.log_level)?;

    let config_service = ConfigService::new(Box::new(CliConfigAdapter::new(cli.clone())));
    let config = config_service.get_config()?;

    // 若啟用 --show-config，在轉換前顯示配置
    if cli.show_config {
        println!("實際使用的配置：{:#?}", config);
    }

    let conversion_port: Box<dyn ConversionPort> = Box::new(ConversionAdapter);
    conversion_port.execute(config)
}

// CLI 配置適配器
pub struct CliConfigAdapter {
    cli: Cli,
}

impl CliConfigAdapter {
    pub fn new(cli: Cli) -> Self {
        CliConfigAdapter { cli }
    }
}

impl ConfigPort for CliConfigAdapter {
    fn get_config(&self) -> io::Result<AppConfig> {
        // 驗證來源資料夾
        validate_folder_path(&self.cli.folder)?;

        if self.cli.from == self.cli.to {
            log::warn!("輸入與輸出格式相同：{}", self.cli.from);
        }

        Ok(AppConfig {
            folder: self.cli.folder.clone(),
            source_format: self.cli.from,
            target_format: self.cli.to,
            replace_originals: self.cli.replace,
            no_progress: self.cli.no_progress,
            log_level: self.cli.log_level.clone(),
            magick_binary: self.cli.magick.clone(),
        })
    }
}
