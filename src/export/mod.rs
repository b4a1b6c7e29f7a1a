//! ライブラリのCSVエクスポート（CLI版）

use crate::error::Result;
use card_scan_common::{export_file_name, write_csv, IdGenerator, LibraryStore};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// 今日の日付 (YYYY-MM-DD, ローカル時刻)
pub fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// 出力先がディレクトリなら日付入りファイル名を付ける
fn output_path(output: &Path, iso_date: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(export_file_name(iso_date))
    } else {
        output.to_path_buf()
    }
}

/// エクスポート1回につき1ファイルを書き出す
pub fn export_library<G: IdGenerator>(library: &LibraryStore<G>, output: &Path) -> Result<PathBuf> {
    export_library_dated(library, output, &today())
}

pub fn export_library_dated<G: IdGenerator>(
    library: &LibraryStore<G>,
    output: &Path,
    iso_date: &str,
) -> Result<PathBuf> {
    let path = output_path(output, iso_date);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = BufWriter::new(File::create(&path)?);
    write_csv(&mut writer, library.export_rows())?;

    log::info!("CSV出力: {} ({}種類)", path.display(), library.len());
    Ok(path)
}
