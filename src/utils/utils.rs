use std::io::{self, Write};
use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use crate::models::conversion::{ConversionOutcome, ProgressEvent};

pub fn setup_logging(log_level: &str) -> io::Result<()> {
    let log_level_filter = match log_level {
        "debug" => log::LevelFilter::Debug,
        "info" => log::LevelFilter::Info,
        "warn" => log::LevelFilter::Warn,
        "error" => log::LevelFilter::Error,
        _ => log::LevelFilter::Info,
    };
    let result = env_logger::Builder::new()
        .filter_level(log_level_filter)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {:<5} {}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init();
    // 互動模式與指令模式可能各呼叫一次，重複初始化時沿用既有設定
    if result.is_err() {
        log::set_max_level(log_level_filter);
    }
    Ok(())
}

pub struct ProgressManager {
    pb: ProgressBar,
    total: u64,
    no_progress: bool,
}

impl ProgressManager {
    pub fn new(total: u64, no_progress: bool) -> Self {
        let pb = if no_progress {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new(total);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{msg} [{bar:40}] {pos}/{len} ETA: {eta_precise}")
                    .unwrap()
                    .progress_chars("##-"),
            );
            pb
        };
        ProgressManager { pb, total, no_progress }
    }

    /// 顯示目前檔案，格式為「檔名 (目前/總數)」
    pub fn update(&self, event: &ProgressEvent) {
        if self.no_progress {
            return;
        }
        self.pb.set_message(progress_label(event, self.total));
        self.pb.set_position(event.index as u64);
    }

    pub fn finish(&self, outcome: &ConversionOutcome) {
        if self.no_progress {
            return;
        }
        let msg = format!(
            "完成，共 {} 個檔案，成功 {} 個，失敗 {} 個",
            outcome.processed_count,
            outcome.succeeded_count(),
            outcome.errors.len()
        );
        self.pb.finish_with_message(msg);
    }
}

pub fn create_progress_bar(total: u64, no_progress: bool) -> ProgressManager {
    ProgressManager::new(total, no_progress)
}

pub fn progress_label(event: &ProgressEvent, total: u64) -> String {
    format!("{} ({}/{})", event.filename, event.index, total)
}

/// 產生結束訊息：全部成功，或逐一列出每個檔案的錯誤與刪除警告
pub fn summarize_outcome(outcome: &ConversionOutcome) -> String {
    let mut lines = Vec::new();
    if outcome.errors.is_empty() {
        lines.push("圖片轉換全部成功完成。".to_string());
    } else {
        lines.push("轉換過程中發生以下錯誤：".to_string());
        lines.extend(outcome.errors.iter().map(|e| e.to_string()));
    }
    if !outcome.warnings.is_empty() {
        lines.push("以下原始檔案已轉換但未能刪除：".to_string());
        lines.extend(outcome.warnings.iter().map(|w| format!("{}：{}", w.filename, w.message)));
    }
    if outcome.cancelled {
        lines.push(format!("轉換已取消，僅處理了 {} 個檔案。", outcome.processed_count));
    }
    lines.join("\n")
}
