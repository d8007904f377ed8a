use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use log::{error, info, warn};
use crate::config::ports::{AppConfig, ConversionPort};
use crate::facade::conversion_facade::ConversionFacade;
use crate::facade::traits::i_conversion::ConversionFacadeTrait;
use crate::models::conversion::{ConversionInput, ConversionOutcome, JobEvent};
use crate::service::file::FileService;
use crate::service::heic::MagickCodec;
use crate::service::job_runner::{JobHandle, JobRunner};
use crate::service::raster::ImageRsCodec;
use crate::service::traits::i_service::HeicCodecTrait;
use crate::utils::utils::{create_progress_bar, summarize_outcome};

/// 轉換執行適配器：偵測後端、啟動背景工作並在終端顯示進度
pub struct ConversionAdapter;

impl ConversionAdapter {
    pub fn build_facade(config: &AppConfig) -> ConversionFacade {
        let heic = MagickCodec::detect(&config.magick_binary)
            .map(|codec| Arc::new(codec) as Arc<dyn HeicCodecTrait>);
        let runner = JobRunner::new(Arc::new(ImageRsCodec::new()), heic);
        ConversionFacade::new(Box::new(FileService::new()), runner)
    }
}

impl ConversionPort for ConversionAdapter {
    fn execute(&self, config: AppConfig) -> io::Result<ConversionOutcome> {
        let facade = Self::build_facade(&config);
        let handle = facade
            .start_conversion(ConversionInput {
                folder: PathBuf::from(&config.folder),
                source_format: config.source_format,
                target_format: config.target_format,
                replace_originals: config.replace_originals,
            })
            .map_err(|e| {
                error!("無法開始轉換：{}", e);
                e
            })?;

        let outcome = follow_job(handle, config.no_progress)?;
        println!("{}", summarize_outcome(&outcome));
        Ok(outcome)
    }
}

/// 在前景接收事件並更新進度條，直到收到結束事件
pub fn follow_job(handle: JobHandle, no_progress: bool) -> io::Result<ConversionOutcome> {
    let pm = create_progress_bar(handle.total() as u64, no_progress);
    let mut finished = None;
    for event in handle.events() {
        match event {
            JobEvent::Progress(progress) => pm.update(&progress),
            JobEvent::Finished(outcome) => {
                pm.finish(&outcome);
                finished = Some(outcome);
                break;
            }
        }
    }

    match finished {
        Some(outcome) => {
            // 結束事件已收到，執行緒隨即結束
            if let Err(e) = handle.join() {
                warn!("等待轉換執行緒結束失敗：{}", e);
            }
            if outcome.is_success() {
                info!("轉換完成，共 {} 個檔案", outcome.processed_count);
            } else {
                warn!("轉換完成，{} 個檔案失敗", outcome.errors.len());
            }
            Ok(outcome)
        }
        None => Err(io::Error::new(io::ErrorKind::Other, "轉換執行緒未回報結果")),
    }
}
