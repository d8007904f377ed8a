use std::path::PathBuf;
use crate::config::config::ImageFormat;

#[derive(Clone)]
pub struct FileCollectInput {
    pub folder: PathBuf,
    pub format: ImageFormat,
}

#[derive(Debug)]
pub struct FileCollectOutput {
    /// 依檔名排序的候選檔名（不含路徑）
    pub files: Vec<String>,
}
