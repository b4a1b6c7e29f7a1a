use super::{CaptureSource, ImageBytes, MATCH_INPUT_SIZE};
use card_scan_common::ScanError;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;
use std::path::{Path, PathBuf};

const JPEG_QUALITY: u8 = 85;

/// カメラのフレームファイルから静止画を取得
///
/// `ffmpeg -f v4l2 -i /dev/video0 -update 1 -y frame.jpg` のように
/// 外部ツールが書き続けるファイルを、読むたびに224x224へ引き伸ばしてJPEG化する
#[derive(Debug, Clone)]
pub struct FrameSource {
    path: PathBuf,
}

impl FrameSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CaptureSource for FrameSource {
    fn capture_still(&mut self) -> Result<ImageBytes, ScanError> {
        let bytes = std::fs::read(&self.path).map_err(|e| {
            ScanError::CaptureUnavailable(format!("カメラフレームがありません ({}): {}", self.path.display(), e))
        })?;

        // 書き込み途中のフレームはデコードに失敗するので、次のティックに任せる
        let frame = image::load_from_memory(&bytes).map_err(|e| {
            ScanError::CaptureUnavailable(format!("フレームをデコードできません: {}", e))
        })?;

        encode_for_matcher(&frame)
    }
}

/// 照合サービスの入力サイズへ引き伸ばしてJPEGにする
fn encode_for_matcher(frame: &DynamicImage) -> Result<ImageBytes, ScanError> {
    let resized = frame.resize_exact(MATCH_INPUT_SIZE, MATCH_INPUT_SIZE, FilterType::Triangle);
    let rgb = DynamicImage::ImageRgb8(resized.to_rgb8());

    let mut data = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut data, JPEG_QUALITY);
    rgb.write_with_encoder(encoder)
        .map_err(|e| ScanError::CaptureUnavailable(format!("JPEGエンコードエラー: {}", e)))?;

    Ok(ImageBytes {
        data,
        mime_type: "image/jpeg",
        width: MATCH_INPUT_SIZE,
        height: MATCH_INPUT_SIZE,
    })
}
