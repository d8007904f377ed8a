use std::any::Any;
use std::fs;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use image::{ColorType, DynamicImage};
use log::{debug, error, info, warn};
use crate::config::config::ImageFormat;
use crate::error::ConversionError;
use crate::models::conversion::{ConversionOutcome, ConversionRequest, FileError, JobEvent, ProgressEvent};
use crate::service::traits::i_service::{HeicCodecTrait, RasterCodecTrait};

/// 依序轉換請求中的每個檔案，單一檔案失敗不會中止整個工作
pub struct JobRunner {
    raster: Arc<dyn RasterCodecTrait>,
    heic: Option<Arc<dyn HeicCodecTrait>>,
}

impl JobRunner {
    pub fn new(raster: Arc<dyn RasterCodecTrait>, heic: Option<Arc<dyn HeicCodecTrait>>) -> Self {
        JobRunner { raster, heic }
    }

    pub fn heic_available(&self) -> bool {
        self.heic.is_some()
    }

    /// 在目前執行緒執行整個工作
    /// # 參數
    /// - request: 已驗證的轉換請求
    /// - cancel: 每個檔案之間檢查的取消旗標
    /// - on_progress: 每處理完一個檔案（不論成功與否）呼叫一次
    /// # 回傳
    /// - 工作結果，包含所有檔案的錯誤
    pub fn run<F>(&self, request: &ConversionRequest, cancel: &AtomicBool, mut on_progress: F) -> ConversionOutcome
    where
        F: FnMut(ProgressEvent),
    {
        let mut outcome = ConversionOutcome::default();
        let total = request.candidate_files.len();
        info!(
            "開始轉換 {} 個檔案：{} -> {}，資料夾：{}，取代原檔：{}",
            total,
            request.source_format,
            request.target_format,
            request.source_folder.display(),
            request.replace_originals
        );

        for (i, filename) in request.candidate_files.iter().enumerate() {
            if cancel.load(Ordering::SeqCst) {
                warn!("轉換已取消，剩餘 {} 個檔案未處理", total - i);
                outcome.cancelled = true;
                break;
            }

            let input_path = request.source_folder.join(filename);
            let result = panic::catch_unwind(AssertUnwindSafe(|| self.convert_file(request, filename)))
                .unwrap_or_else(|payload| Err(ConversionError::Panicked(panic_message(payload))));

            match result {
                Ok(output_path) => {
                    debug!("轉換完成：{} -> {}", filename, output_path.display());
                    if request.replace_originals {
                        if let Err(e) = fs::remove_file(&input_path) {
                            warn!("已轉換但無法刪除原檔 {}：{}", input_path.display(), e);
                            outcome.warnings.push(FileError {
                                filename: filename.clone(),
                                message: format!("無法刪除原檔：{}", e),
                            });
                        }
                    }
                }
                Err(e) => {
                    error!("轉換 {} 失敗: {}", filename, e);
                    outcome.errors.push(FileError {
                        filename: filename.clone(),
                        message: e.to_string(),
                    });
                }
            }

            outcome.processed_count += 1;
            on_progress(ProgressEvent { index: i + 1, filename: filename.clone() });
        }

        info!(
            "轉換結束，共處理 {} 個檔案，{} 個失敗，{} 個警告",
            outcome.processed_count,
            outcome.errors.len(),
            outcome.warnings.len()
        );
        outcome
    }

    fn convert_file(&self, request: &ConversionRequest, filename: &str) -> Result<PathBuf, ConversionError> {
        let input_path = request.source_folder.join(filename);
        let output_path = output_path_for(&request.source_folder, filename, request.target_format)?;

        if request.source_format == request.target_format {
            return Err(ConversionError::SameFormat);
        }

        if request.involves_heic() {
            let heic = self.heic.as_ref().ok_or(ConversionError::BackendUnavailable)?;
            heic.transcode(&input_path, &output_path, request.target_format)?;
        } else {
            let image = self.raster.decode(&input_path)?;
            let image = prepare_for_target(image, request.target_format);
            self.raster.encode(&image, &output_path, request.target_format)?;
        }
        Ok(output_path)
    }

    /// 在背景執行緒執行工作，事件經由 channel 依序送出
    /// # 參數
    /// - request: 已驗證的轉換請求
    /// - slot: 單一工作的佔用權，在送出 Finished 前釋放
    /// # 回傳
    /// - 成功時返回 JobHandle，無法建立執行緒時返回 IO 錯誤
    pub fn spawn(self: &Arc<Self>, request: ConversionRequest, slot: JobSlot) -> io::Result<JobHandle> {
        let (tx, rx) = mpsc::channel();
        let cancel = Arc::new(AtomicBool::new(false));
        let total = request.candidate_files.len();
        let runner = Arc::clone(self);
        let worker_cancel = Arc::clone(&cancel);

        let worker = thread::Builder::new()
            .name("image-convert-worker".to_string())
            .spawn(move || {
                let outcome = runner.run(&request, &worker_cancel, |event| {
                    // 前景已放棄接收時繼續完成轉換
                    let _ = tx.send(JobEvent::Progress(event));
                });
                drop(slot);
                let _ = tx.send(JobEvent::Finished(outcome));
            })?;

        Ok(JobHandle {
            events: rx,
            cancel,
            worker: Some(worker),
            total,
        })
    }
}

/// 輸出路徑：來源資料夾 / 去掉最後一個副檔名的檔名 + 目標副檔名
pub fn output_path_for(folder: &Path, filename: &str, target: ImageFormat) -> Result<PathBuf, ConversionError> {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| ConversionError::InvalidFileName(filename.to_string()))?;
    Ok(folder.join(format!("{}{}", stem, target.output_extension())))
}

/// JPG 無法儲存透明度或非 8 位元 RGB 的色彩模式，一律轉為 RGB
pub fn prepare_for_target(image: DynamicImage, target: ImageFormat) -> DynamicImage {
    if target == ImageFormat::Jpg && image.color() != ColorType::Rgb8 {
        debug!("色彩模式 {:?} 轉為 RGB 以輸出 JPEG", image.color());
        DynamicImage::ImageRgb8(image.to_rgb8())
    } else {
        image
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "未知錯誤".to_string()
    }
}

/// 同一時間只允許一個工作的佔用權，drop 時釋放
pub struct JobSlot {
    busy: Arc<AtomicBool>,
}

impl JobSlot {
    pub fn acquire(busy: &Arc<AtomicBool>) -> Option<JobSlot> {
        busy.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| JobSlot { busy: Arc::clone(busy) })
    }
}

impl Drop for JobSlot {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::SeqCst);
    }
}

/// 背景工作的前景端：接收事件、要求取消
pub struct JobHandle {
    events: Receiver<JobEvent>,
    cancel: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
    total: usize,
}

impl JobHandle {
    pub fn total(&self) -> usize {
        self.total
    }

    /// 要求在下一個檔案開始前停止
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    /// 阻塞等待下一個事件，工作結束且事件取完後返回 None
    pub fn recv(&self) -> Option<JobEvent> {
        self.events.recv().ok()
    }

    /// 不阻塞地取得下一個事件，適合在畫面更新迴圈中輪詢
    pub fn try_recv(&self) -> Option<JobEvent> {
        match self.events.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    pub fn events(&self) -> impl Iterator<Item = JobEvent> + '_ {
        self.events.iter()
    }

    /// 丟棄進度事件，等待並返回最終結果
    pub fn wait(mut self) -> io::Result<ConversionOutcome> {
        let mut finished = None;
        for event in self.events.iter() {
            if let JobEvent::Finished(outcome) = event {
                finished = Some(outcome);
            }
        }
        self.join_worker()?;
        finished.ok_or_else(|| io::Error::new(io::ErrorKind::Other, "轉換執行緒未回報結果"))
    }

    /// 已自行取得結束事件時，只等待執行緒結束
    pub fn join(mut self) -> io::Result<()> {
        self.join_worker()
    }

    fn join_worker(&mut self) -> io::Result<()> {
        match self.worker.take() {
            Some(worker) => worker
                .join()
                .map_err(|_| io::Error::new(io::ErrorKind::Other, "轉換執行緒異常結束")),
            None => Ok(()),
        }
    }
}
