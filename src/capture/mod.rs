//! 静止画の取得
//!
//! - FrameSource: カメラツールが上書きし続けるフレームファイルを224x224に縮小
//! - UploadSource: ユーザーが指定した1枚の画像ファイル

mod frame;
mod upload;

pub use frame::FrameSource;
pub use upload::UploadSource;

use card_scan_common::ScanError;
use std::path::Path;

/// 照合サービスの入力サイズ
pub const MATCH_INPUT_SIZE: u32 = 224;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// エンコード済みの静止画
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBytes {
    pub data: Vec<u8>,
    pub mime_type: &'static str,
    pub width: u32,
    pub height: u32,
}

/// 静止画を1枚取得する。共有状態は変更しない
pub trait CaptureSource {
    fn capture_still(&mut self) -> Result<ImageBytes, ScanError>;
}

/// 対応する画像拡張子か（大文字小文字は区別しない）
pub fn is_image_extension(ext: &str) -> bool {
    IMAGE_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext))
}

pub fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| is_image_extension(&ext.to_string_lossy()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_image_extension() {
        assert!(is_image_extension("jpg"));
        assert!(is_image_extension("JPG"));
        assert!(is_image_extension("jpeg"));
        assert!(is_image_extension("Png"));
        assert!(!is_image_extension("txt"));
        assert!(!is_image_extension("gif"));
        assert!(!is_image_extension("webp"));
    }

    #[test]
    fn test_has_image_extension() {
        assert!(has_image_extension(Path::new("cards/bolt.JPEG")));
        assert!(!has_image_extension(Path::new("cards/bolt")));
        assert!(!has_image_extension(Path::new("cards/notes.txt")));
    }
}
