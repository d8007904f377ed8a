use std::io;
use std::process::ExitCode;

use image_converter::action::cli::process_args;

fn main() -> io::Result<ExitCode> {
    let args: Vec<String> = std::env::args().collect();
    let outcome = process_args(args)?;
    log::info!("程式執行完成，處理 {} 個檔案，{} 個失敗", outcome.processed_count, outcome.errors.len());
    if outcome.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
