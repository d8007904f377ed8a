use std::fmt;
use std::path::PathBuf;
use crate::config::config::ImageFormat;
use crate::error::ValidationError;

/// Facade 的輸入參數，尚未列出候選檔案
#[derive(Clone, Debug)]
pub struct ConversionInput {
    pub folder: PathBuf,
    pub source_format: ImageFormat,
    pub target_format: ImageFormat,
    pub replace_originals: bool,
}

/// 一次轉換工作的完整請求，建立後經過驗證才交給 JobRunner，不重複使用
#[derive(Clone, Debug)]
pub struct ConversionRequest {
    pub source_folder: PathBuf,
    pub source_format: ImageFormat,
    pub target_format: ImageFormat,
    pub replace_originals: bool,
    pub candidate_files: Vec<String>,
}

impl ConversionRequest {
    pub fn new(input: ConversionInput, candidate_files: Vec<String>) -> Self {
        ConversionRequest {
            source_folder: input.folder,
            source_format: input.source_format,
            target_format: input.target_format,
            replace_originals: input.replace_originals,
            candidate_files,
        }
    }

    pub fn involves_heic(&self) -> bool {
        self.source_format.is_heic() || self.target_format.is_heic()
    }

    /// 檢查請求的不變條件
    /// # 參數
    /// - heic_available: HEIC 後端是否可用
    /// # 回傳
    /// - 任一條件不成立時返回對應的 ValidationError
    pub fn validate(&self, heic_available: bool) -> Result<(), ValidationError> {
        if self.source_format == self.target_format {
            return Err(ValidationError::SameFormat(self.source_format));
        }
        if !self.source_folder.is_dir() {
            return Err(ValidationError::InvalidFolder(self.source_folder.clone()));
        }
        if self.candidate_files.is_empty() {
            return Err(ValidationError::NoCandidates {
                folder: self.source_folder.clone(),
                format: self.source_format,
            });
        }
        if self.involves_heic() && !heic_available {
            return Err(ValidationError::BackendUnavailable);
        }
        for filename in &self.candidate_files {
            if !self.source_format.matches_file_name(filename) {
                return Err(ValidationError::ExtensionMismatch {
                    filename: filename.clone(),
                    format: self.source_format,
                });
            }
            if !self.source_folder.join(filename).is_file() {
                return Err(ValidationError::MissingFile(filename.clone()));
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileError {
    pub filename: String,
    pub message: String,
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "轉換 {} 時發生錯誤：{}", self.filename, self.message)
    }
}

/// 工作結果。工作結束後以值的方式交還給呼叫端
#[derive(Clone, Debug, Default)]
pub struct ConversionOutcome {
    pub processed_count: usize,
    pub errors: Vec<FileError>,
    /// 轉換成功但刪除原檔失敗的檔案
    pub warnings: Vec<FileError>,
    pub cancelled: bool,
}

impl ConversionOutcome {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn succeeded_count(&self) -> usize {
        self.processed_count - self.errors.len()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgressEvent {
    /// 從 1 開始
    pub index: usize,
    pub filename: String,
}

#[derive(Debug)]
pub enum JobEvent {
    Progress(ProgressEvent),
    Finished(ConversionOutcome),
}
