//! Card Scan Common Library
//!
//! CLIとフロントエンドで共有される型とコアロジック
//! （ライブラリ集計・スキャン状態機械・照合レスポンス・CSV出力）

pub mod types;
pub mod error;
pub mod library;
pub mod response;
pub mod session;
pub mod csv;

pub use types::{CardEntry, MatchResult};
pub use error::{Error, Result, ScanError};
pub use library::{Adjusted, ExportRow, ExportRows, IdGenerator, LibraryStore, SequentialIds};
pub use response::{parse_match_response, MatchRequest};
pub use session::{Effect, ScanController, ScanState, StatusSnapshot};
pub use csv::{export_file_name, render_csv, write_csv, CSV_HEADER};
