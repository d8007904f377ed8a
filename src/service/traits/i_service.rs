use std::io;
use std::path::Path;
use image::DynamicImage;
use crate::config::config::ImageFormat;
use crate::error::ConversionError;
use crate::models::file::{FileCollectInput, FileCollectOutput};

// File 服務接口，負責列出候選檔案
pub trait FileServiceTrait: Send + Sync {
    /// 列出資料夾中符合來源格式的檔案
    /// # 參數
    /// - input: 資料夾與來源格式
    /// # 回傳
    /// - 成功時返回依檔名排序的檔名列表，失敗時返回 IO 錯誤
    fn collect_files(&self, input: FileCollectInput) -> io::Result<FileCollectOutput>;
}

// 一般點陣圖編解碼接口（PNG、JPG、BMP）
pub trait RasterCodecTrait: Send + Sync {
    /// 讀取並解碼圖片
    fn decode(&self, path: &Path) -> Result<DynamicImage, ConversionError>;

    /// 以指定格式編碼並寫入圖片
    fn encode(&self, image: &DynamicImage, path: &Path, format: ImageFormat) -> Result<(), ConversionError>;
}

// HEIC 編解碼接口，執行期可能不存在
pub trait HeicCodecTrait: Send + Sync {
    /// 讀取 input 並以 format 寫入 output
    fn transcode(&self, input: &Path, output: &Path, format: ImageFormat) -> Result<(), ConversionError>;
}
