//! 測試共用的圖片產生器與假後端

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
use image_converter::config::config::ImageFormat;
use image_converter::error::ConversionError;
use image_converter::models::conversion::{ConversionOutcome, ConversionRequest, ProgressEvent};
use image_converter::service::job_runner::JobRunner;
use image_converter::service::raster::ImageRsCodec;
use image_converter::service::traits::i_service::{HeicCodecTrait, RasterCodecTrait};

/// 寫入一張 4x4 的不透明 PNG
pub fn write_rgb_png(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    RgbImage::from_pixel(4, 4, Rgb([200, 100, 50]))
        .save_with_format(&path, image::ImageFormat::Png)
        .unwrap();
    path
}

/// 寫入一張帶透明度的 PNG
pub fn write_rgba_png(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 128]))
        .save_with_format(&path, image::ImageFormat::Png)
        .unwrap();
    path
}

pub fn write_corrupt(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, b"definitely not an image").unwrap();
    path
}

pub fn request(
    folder: &Path,
    source_format: ImageFormat,
    target_format: ImageFormat,
    replace_originals: bool,
    files: &[&str],
) -> ConversionRequest {
    ConversionRequest {
        source_folder: folder.to_path_buf(),
        source_format,
        target_format,
        replace_originals,
        candidate_files: files.iter().map(|f| f.to_string()).collect(),
    }
}

pub fn raster_only_runner() -> JobRunner {
    JobRunner::new(Arc::new(ImageRsCodec::new()), None)
}

pub fn runner_with_heic(heic: Arc<FakeHeic>) -> JobRunner {
    JobRunner::new(Arc::new(ImageRsCodec::new()), Some(heic as Arc<dyn HeicCodecTrait>))
}

/// 同步執行並收集所有進度事件
pub fn run_collecting(runner: &JobRunner, request: &ConversionRequest) -> (ConversionOutcome, Vec<ProgressEvent>) {
    let mut events = Vec::new();
    let cancel = AtomicBool::new(false);
    let outcome = runner.run(request, &cancel, |event| events.push(event));
    (outcome, events)
}

/// 假 HEIC 後端：寫入固定內容並記錄呼叫
#[derive(Default)]
pub struct FakeHeic {
    pub calls: Mutex<Vec<(PathBuf, PathBuf, ImageFormat)>>,
    /// 轉換時一併刪除輸入檔，用來製造刪除失敗
    pub remove_input: bool,
}

impl HeicCodecTrait for FakeHeic {
    fn transcode(&self, input: &Path, output: &Path, format: ImageFormat) -> Result<(), ConversionError> {
        if !input.exists() {
            return Err(ConversionError::Backend(format!("no such file: {}", input.display())));
        }
        fs::write(output, format.codec_identifier().as_bytes())?;
        if self.remove_input {
            fs::remove_file(input)?;
        }
        self.calls
            .lock()
            .unwrap()
            .push((input.to_path_buf(), output.to_path_buf(), format));
        Ok(())
    }
}

/// 每次解碼前通知測試並等待放行的點陣圖後端
pub struct GatedRaster {
    gate: Mutex<Receiver<()>>,
    entered: Mutex<Sender<()>>,
    inner: ImageRsCodec,
}

impl GatedRaster {
    /// 返回後端、放行用的 Sender 與「已進入解碼」通知的 Receiver
    pub fn new() -> (GatedRaster, Sender<()>, Receiver<()>) {
        let (release, gate) = mpsc::channel();
        let (entered, entered_rx) = mpsc::channel();
        let raster = GatedRaster {
            gate: Mutex::new(gate),
            entered: Mutex::new(entered),
            inner: ImageRsCodec::new(),
        };
        (raster, release, entered_rx)
    }
}

impl RasterCodecTrait for GatedRaster {
    fn decode(&self, path: &Path) -> Result<DynamicImage, ConversionError> {
        self.entered.lock().unwrap().send(()).ok();
        self.gate.lock().unwrap().recv().ok();
        self.inner.decode(path)
    }

    fn encode(&self, image: &DynamicImage, path: &Path, format: ImageFormat) -> Result<(), ConversionError> {
        self.inner.encode(image, path, format)
    }
}

/// 解碼時 panic 的點陣圖後端
pub struct PanickingRaster;

impl RasterCodecTrait for PanickingRaster {
    fn decode(&self, _path: &Path) -> Result<DynamicImage, ConversionError> {
        panic!("decoder blew up");
    }

    fn encode(&self, _image: &DynamicImage, _path: &Path, _format: ImageFormat) -> Result<(), ConversionError> {
        Ok(())
    }
}
