use std::path::Path;
use image::{DynamicImage, ImageReader};
use log::debug;
use crate::config::config::ImageFormat;
use crate::error::ConversionError;
use crate::service::traits::i_service::RasterCodecTrait;

/// 以 image crate 實作的點陣圖編解碼器
pub struct ImageRsCodec;

impl ImageRsCodec {
    pub fn new() -> Self {
        ImageRsCodec
    }
}

impl Default for ImageRsCodec {
    fn default() -> Self {
        Self::new()
    }
}

/// 對應到 image crate 的格式，HEIC 不支援
pub fn to_image_format(format: ImageFormat) -> Option<image::ImageFormat> {
    match format {
        ImageFormat::Png => Some(image::ImageFormat::Png),
        ImageFormat::Jpg => Some(image::ImageFormat::Jpeg),
        ImageFormat::Bmp => Some(image::ImageFormat::Bmp),
        ImageFormat::Heic => None,
    }
}

impl RasterCodecTrait for ImageRsCodec {
    fn decode(&self, path: &Path) -> Result<DynamicImage, ConversionError> {
        // 以內容判斷格式，副檔名與實際格式不符時仍可讀取
        let image = ImageReader::open(path)?
            .with_guessed_format()?
            .decode()
            .map_err(|e| ConversionError::Decode(e.to_string()))?;
        debug!("讀取圖片：{}，{}x{}，色彩模式：{:?}", path.display(), image.width(), image.height(), image.color());
        Ok(image)
    }

    fn encode(&self, image: &DynamicImage, path: &Path, format: ImageFormat) -> Result<(), ConversionError> {
        let codec_format = to_image_format(format).ok_or_else(|| {
            ConversionError::Encode(format!("不支援以 {} 編碼", format.codec_identifier()))
        })?;
        image
            .save_with_format(path, codec_format)
            .map_err(|e| ConversionError::Encode(e.to_string()))
    }
}
