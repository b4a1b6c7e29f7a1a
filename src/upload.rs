//! アップロード版: 画像ファイルを1枚ずつ照合する
//!
//! - identify_image: 1枚だけ照合
//! - run_batch: フォルダ内の画像を順番に照合（同時に1件まで）

use crate::capture::{CaptureSource, UploadSource};
use crate::matcher::Matcher;
use crate::scanner::ImageInfo;
use card_scan_common::{Effect, LibraryStore, MatchResult, ScanController, ScanError};
use indicatif::ProgressBar;
use std::path::Path;
use std::time::Instant;

/// 1枚分の照合結果
#[derive(Debug, Clone)]
pub struct Identified {
    pub file_name: String,
    pub width: u32,
    pub height: u32,
    pub result: MatchResult,
    pub effects: Vec<Effect>,
}

impl Identified {
    pub fn is_match(&self) -> bool {
        self.result.matched_name().is_some()
    }
}

pub async fn identify_image<M: Matcher>(
    path: &Path,
    matcher: &M,
    controller: &mut ScanController,
    library: &mut LibraryStore,
) -> Result<Identified, ScanError> {
    let mut source = UploadSource::new(path);
    let image = source.capture_still()?;
    let (width, height) = (image.width, image.height);

    let result = matcher.submit(image).await?;
    let effects = controller.apply_match(Instant::now(), &result, library);

    Ok(Identified {
        file_name: path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default(),
        width,
        height,
        result,
        effects,
    })
}

#[derive(Debug, Default)]
pub struct BatchSummary {
    pub library: LibraryStore,
    pub matched: usize,
    pub unmatched: Vec<String>,
    /// (ファイル名, エラーメッセージ)
    pub failed: Vec<(String, String)>,
}

/// フォルダ内の画像を順番に照合
///
/// 1枚の失敗では止めず、最後にまとめて報告する
pub async fn run_batch<M: Matcher>(
    images: &[ImageInfo],
    matcher: &M,
    progress: &ProgressBar,
) -> BatchSummary {
    let mut controller = ScanController::default();
    let mut summary = BatchSummary::default();

    for image in images {
        progress.set_message(image.file_name.clone());

        match identify_image(&image.path, matcher, &mut controller, &mut summary.library).await {
            Ok(identified) if identified.is_match() => {
                summary.matched += 1;
                for effect in &identified.effects {
                    if let Effect::Matched { entry, .. } = effect {
                        progress.println(format!("✔ {} → {}", image.file_name, entry.name));
                    }
                }
            }
            Ok(_) => {
                log::info!("一致なし: {}", image.file_name);
                summary.unmatched.push(image.file_name.clone());
            }
            Err(e) => {
                progress.println(format!("⚠ {}: {}", image.file_name, e));
                summary.failed.push((image.file_name.clone(), e.to_string()));
            }
        }

        progress.inc(1);
    }

    summary
}
