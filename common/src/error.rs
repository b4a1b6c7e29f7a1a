//! エラー型定義
//!
//! - Error: ライブラリ操作・CSV出力の失敗
//! - ScanError: スキャン1サイクル分の失敗（取得・通信・サーバー・デコード）

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("カード名が空です")]
    EmptyCardName,
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

/// スキャンサイクルの失敗
///
/// いずれもセッションを止めず、現在のエラーとして表示されるだけ。
/// 次のサイクルの成功で消え、別の失敗で置き換わる。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// フレーム・ファイルが取得できない
    #[error("画像を取得できません: {0}")]
    CaptureUnavailable(String),

    /// リクエストの送信・受信に失敗（タイムアウト含む）
    #[error("通信エラー: {0}")]
    Network(String),

    /// 2xx以外のレスポンス。本文はそのまま保持する
    #[error("サーバーエラー (HTTP {status}): {body}")]
    Server { status: u16, body: String },

    /// 成功レスポンスの本文が不正
    #[error("レスポンスの解析に失敗: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = Error::Io(io_error);
        let display = format!("{}", error);
        assert!(display.contains("IO error"));
        assert!(display.contains("file not found"));
    }

    #[test]
    fn test_error_display_empty_name() {
        assert_eq!(Error::EmptyCardName.to_string(), "カード名が空です");
    }

    #[test]
    fn test_error_from_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let error: Error = io_error.into();
        assert!(matches!(error, Error::Io(_)));
    }

    #[test]
    fn test_server_error_keeps_status_and_body() {
        let error = ScanError::Server {
            status: 500,
            body: "overloaded".to_string(),
        };
        let display = error.to_string();
        assert!(display.contains("500"));
        assert!(display.contains("overloaded"));
    }

    #[test]
    fn test_scan_error_display_not_empty() {
        let errors = vec![
            ScanError::CaptureUnavailable("フレームなし".to_string()),
            ScanError::Network("connection refused".to_string()),
            ScanError::Decode("expected value".to_string()),
        ];

        for err in errors {
            assert!(!err.to_string().is_empty(), "エラーメッセージが空: {:?}", err);
        }
    }
}
