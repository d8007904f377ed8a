use std::io;
use std::path::PathBuf;
use thiserror::Error;
use crate::config::config::ImageFormat;

/// 請求層級的驗證錯誤，在工作開始前回報，不會觸碰任何檔案
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("輸入與輸出格式不能相同（{0}）")]
    SameFormat(ImageFormat),

    #[error("無效的資料夾路徑：{}", .0.display())]
    InvalidFolder(PathBuf),

    #[error("無法讀取資料夾 {}：{source}", .folder.display())]
    ListFolder {
        folder: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("資料夾 {} 中找不到 {format} 圖片", .folder.display())]
    NoCandidates { folder: PathBuf, format: ImageFormat },

    #[error("HEIC 轉換需要 ImageMagick，但系統中找不到可用的 magick 指令")]
    BackendUnavailable,

    #[error("檔案不存在：{0}")]
    MissingFile(String),

    #[error("檔案 {filename} 不是 {format} 格式")]
    ExtensionMismatch { filename: String, format: ImageFormat },

    #[error("已有轉換工作正在執行")]
    JobInFlight,
}

impl From<ValidationError> for io::Error {
    fn from(err: ValidationError) -> Self {
        let kind = match err {
            ValidationError::InvalidFolder(_) | ValidationError::MissingFile(_) => io::ErrorKind::NotFound,
            _ => io::ErrorKind::InvalidInput,
        };
        io::Error::new(kind, err)
    }
}

/// 單一檔案的轉換錯誤，記錄於結果中，不會中止整個工作
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("輸入與輸出格式不能相同")]
    SameFormat,

    #[error("HEIC 轉換需要 ImageMagick，但目前無法使用（backend unavailable）")]
    BackendUnavailable,

    #[error("無效的檔名：{0}")]
    InvalidFileName(String),

    #[error("無法讀取圖片：{0}")]
    Decode(String),

    #[error("無法寫入圖片：{0}")]
    Encode(String),

    #[error("ImageMagick 執行失敗：{0}")]
    Backend(String),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("轉換過程中發生未預期的錯誤：{0}")]
    Panicked(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_keeps_typed_source_inside_io_error() {
        let err: io::Error = ValidationError::SameFormat(ImageFormat::Png).into();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        let inner = err.into_inner().unwrap().downcast::<ValidationError>().unwrap();
        assert!(matches!(*inner, ValidationError::SameFormat(ImageFormat::Png)));
    }

    #[test]
    fn invalid_folder_maps_to_not_found() {
        let err: io::Error = ValidationError::InvalidFolder(PathBuf::from("nope")).into();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn backend_unavailable_message_names_the_condition() {
        assert!(ConversionError::BackendUnavailable.to_string().contains("backend unavailable"));
    }
}
