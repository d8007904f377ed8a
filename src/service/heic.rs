use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use log::{debug, info, warn};
use crate::config::config::ImageFormat;
use crate::error::ConversionError;
use crate::service::traits::i_service::HeicCodecTrait;

/// 透過 ImageMagick 指令列執行 HEIC 轉換
pub struct MagickCodec {
    binary: PathBuf,
}

impl MagickCodec {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        MagickCodec { binary: binary.into() }
    }

    /// 執行 `<binary> -version` 確認 ImageMagick 可用，只在啟動時呼叫一次
    /// # 回傳
    /// - 可用時返回 MagickCodec，否則返回 None
    pub fn detect(binary: &str) -> Option<Self> {
        let status = Command::new(binary)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        match status {
            Ok(status) if status.success() => {
                info!("偵測到 ImageMagick：{}，HEIC 轉換可用", binary);
                Some(MagickCodec::new(binary))
            }
            Ok(status) => {
                warn!("ImageMagick 檢查失敗（{}），HEIC 轉換不可用", status);
                None
            }
            Err(e) => {
                warn!("找不到 ImageMagick 指令 {}：{}，HEIC 轉換不可用", binary, e);
                None
            }
        }
    }
}

/// 組出輸出參數，例如 `JPEG:/photos/a.JPG`，由格式前綴決定編碼器而非副檔名
pub fn output_spec(output: &Path, format: ImageFormat) -> OsString {
    let mut spec = OsString::from(format!("{}:", format.codec_identifier()));
    spec.push(output.as_os_str());
    spec
}

/// 相對路徑加上 `./`，避免以 `-` 開頭的路徑被當成選項
pub fn input_arg(input: &Path) -> PathBuf {
    if input.is_relative() {
        Path::new(".").join(input)
    } else {
        input.to_path_buf()
    }
}

impl HeicCodecTrait for MagickCodec {
    fn transcode(&self, input: &Path, output: &Path, format: ImageFormat) -> Result<(), ConversionError> {
        let out = Command::new(&self.binary)
            .arg(input_arg(input))
            .arg(output_spec(output, format))
            .stdin(Stdio::null())
            .output()
            .map_err(|e| ConversionError::Backend(format!("無法執行 {}：{}", self.binary.display(), e)))?;

        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();
            let detail = if stderr.is_empty() { out.status.to_string() } else { stderr };
            return Err(ConversionError::Backend(detail));
        }
        debug!("ImageMagick 轉換完成：{} -> {}", input.display(), output.display());
        Ok(())
    }
}
