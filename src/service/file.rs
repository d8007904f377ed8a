use std::io;
use log::{debug, info, warn};
use regex::Regex;
use walkdir::WalkDir;
use crate::config::config::ImageFormat;
use crate::models::file::{FileCollectInput, FileCollectOutput};
use crate::service::traits::i_service::FileServiceTrait;

/// File 服務，列出資料夾第一層中符合來源格式的檔案
pub struct FileService;

impl FileService {
    pub fn new() -> Self {
        FileService
    }
}

impl Default for FileService {
    fn default() -> Self {
        Self::new()
    }
}

/// 建立不分大小寫的副檔名比對規則，例如 `(?i)\.png$`
pub fn extension_regex(format: ImageFormat) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"(?i)\.{}$", regex::escape(format.name())))
}

impl FileServiceTrait for FileService {
    fn collect_files(&self, input: FileCollectInput) -> io::Result<FileCollectOutput> {
        let pattern = extension_regex(input.format)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, format!("無效的副檔名規則: {}", e)))?;
        let mut files = Vec::new();

        for entry in WalkDir::new(&input.folder)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let file_name = match entry.file_name().to_str() {
                Some(name) => name.to_string(),
                None => {
                    warn!("略過無法以 UTF-8 表示的檔名：{}", entry.path().display());
                    continue;
                }
            };
            if pattern.is_match(&file_name) {
                files.push(file_name);
            } else {
                debug!("略過不符合格式的檔案：{}", file_name);
            }
        }

        info!("在 {} 中找到 {} 個 {} 檔案", input.folder.display(), files.len(), input.format);
        Ok(FileCollectOutput { files })
    }
}
