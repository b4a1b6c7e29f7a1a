use super::{has_image_extension, CaptureSource, ImageBytes};
use card_scan_common::ScanError;
use image::{ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// アップロード版: 1回の送信につき1ファイル
///
/// 元のバイト列をそのまま送り、縮小はしない
#[derive(Debug, Clone, Default)]
pub struct UploadSource {
    file: Option<PathBuf>,
}

impl UploadSource {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: Some(file.into()),
        }
    }

    /// 未選択の状態
    pub fn empty() -> Self {
        Self::default()
    }

    /// 次に送信するファイルを選び直す
    pub fn select(&mut self, file: impl Into<PathBuf>) {
        self.file = Some(file.into());
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }
}

impl CaptureSource for UploadSource {
    fn capture_still(&mut self) -> Result<ImageBytes, ScanError> {
        let path = self
            .file
            .as_deref()
            .ok_or_else(|| ScanError::CaptureUnavailable("ファイルが選択されていません".into()))?;

        if !has_image_extension(path) {
            return Err(ScanError::CaptureUnavailable(format!(
                "対応していないファイルです (jpg/jpeg/png): {}",
                path.display()
            )));
        }

        let data = std::fs::read(path).map_err(|e| {
            ScanError::CaptureUnavailable(format!("ファイルを読み込めません ({}): {}", path.display(), e))
        })?;

        let mime_type = match image::guess_format(&data) {
            Ok(ImageFormat::Jpeg) => "image/jpeg",
            Ok(ImageFormat::Png) => "image/png",
            _ => {
                return Err(ScanError::CaptureUnavailable(format!(
                    "JPEG/PNG画像ではありません: {}",
                    path.display()
                )))
            }
        };

        let (width, height) = ImageReader::new(Cursor::new(&data))
            .with_guessed_format()
            .map_err(|e| ScanError::CaptureUnavailable(e.to_string()))?
            .into_dimensions()
            .map_err(|e| {
                ScanError::CaptureUnavailable(format!("画像サイズを取得できません: {}", e))
            })?;

        Ok(ImageBytes {
            data,
            mime_type,
            width,
            height,
        })
    }
}
