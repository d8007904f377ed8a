use clap::{Parser, ValueEnum};
use std::fmt;
use std::io;
use std::path::Path;

#[derive(Parser, Clone)]
#[command(
    name = "image_converter",
    about = "批次轉換資料夾中的圖片格式（HEIC、PNG、JPG、BMP）",
    long_about = "一個批次轉換圖片格式的工具，將指定資料夾中符合來源格式的所有圖片轉換為目標格式，輸出檔案與原檔位於同一資料夾。\nHEIC 轉換需要系統已安裝 ImageMagick（magick 指令），可用 --magick 指定執行檔路徑。\n不帶任何參數執行時進入互動模式。使用 `--help` 查看詳細用法。",
    arg_required_else_help = true
)]
pub struct Cli {
    /// 來源資料夾
    pub folder: String,
    /// 來源格式
    #[arg(short, long = "from", value_enum)]
    pub from: ImageFormat,
    /// 目標格式
    #[arg(short, long = "to", value_enum)]
    pub to: ImageFormat,
    /// 轉換成功後刪除原始圖片
    #[arg(long, default_value_t = false)]
    pub replace: bool,
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
    #[arg(long, default_value = "info", value_parser = ["debug", "info", "warn", "error"])]
    pub log_level: String,
    /// ImageMagick 執行檔路徑，用於 HEIC 轉換
    #[arg(long, default_value = DEFAULT_MAGICK_BINARY)]
    pub magick: String,
    #[arg(long, default_value_t = false)]
    pub show_config: bool,
}

pub const DEFAULT_MAGICK_BINARY: &str = "magick";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum)]
pub enum ImageFormat {
    Heic,
    Png,
    Jpg,
    Bmp,
}

impl ImageFormat {
    pub fn all() -> [ImageFormat; 4] {
        [ImageFormat::Heic, ImageFormat::Png, ImageFormat::Jpg, ImageFormat::Bmp]
    }

    /// 小寫格式名稱，亦即來源檔案的副檔名（不含點）
    pub fn name(&self) -> &'static str {
        match self {
            ImageFormat::Heic => "heic",
            ImageFormat::Png => "png",
            ImageFormat::Jpg => "jpg",
            ImageFormat::Bmp => "bmp",
        }
    }

    /// 輸出檔案的副檔名。HEIC 固定為 ".HEIC"，其餘為大寫格式名稱
    pub fn output_extension(&self) -> String {
        match self {
            ImageFormat::Heic => ".HEIC".to_string(),
            other => format!(".{}", other.name().to_uppercase()),
        }
    }

    /// 編碼器使用的格式識別字，jpg 對應 JPEG
    pub fn codec_identifier(&self) -> &'static str {
        match self {
            ImageFormat::Heic => "HEIC",
            ImageFormat::Png => "PNG",
            ImageFormat::Jpg => "JPEG",
            ImageFormat::Bmp => "BMP",
        }
    }

    pub fn matches_file_name(&self, file_name: &str) -> bool {
        file_name.to_lowercase().ends_with(&format!(".{}", self.name()))
    }

    pub fn is_heic(&self) -> bool {
        *self == ImageFormat::Heic
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name().to_uppercase())
    }
}

pub fn validate_folder_path(folder: &str) -> io::Result<&Path> {
    let path = Path::new(folder);
    if !path.is_dir() {
        log::error!("資料夾不存在或不是目錄：{}", folder);
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("資料夾 '{}' 不存在或不是目錄", folder)
        ));
    }
    Ok(path)
}
