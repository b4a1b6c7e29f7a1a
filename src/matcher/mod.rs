//! 照合サービス連携
//!
//! 画像をbase64でJSONに埋め込み、固定エンドポイントへ1回だけPOSTする。
//! リトライはしない（次のポーリングが独立して再試行する）。

use crate::capture::ImageBytes;
use crate::error::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use card_scan_common::{parse_match_response, MatchRequest, MatchResult, ScanError};
use std::future::Future;
use std::time::Duration;

/// 画像照合の抽象
///
/// スキャンループは照合タスクを別タスクで実行するので、futureはSend必須
pub trait Matcher: Send + Sync + 'static {
    fn submit(&self, image: ImageBytes) -> impl Future<Output = std::result::Result<MatchResult, ScanError>> + Send;
}

/// HTTP照合クライアント
#[derive(Debug, Clone)]
pub struct MatchClient {
    http: reqwest::Client,
    endpoint: String,
}

impl MatchClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post_image(&self, image: &ImageBytes) -> std::result::Result<MatchResult, ScanError> {
        let encoded = STANDARD.encode(&image.data);
        let request = MatchRequest { image: &encoded };

        log::debug!(
            "POST {} ({} bytes, {}x{} {})",
            self.endpoint,
            image.data.len(),
            image.width,
            image.height,
            image.mime_type
        );

        let response = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        let body = response.text().await.map_err(network_error)?;

        if !status.is_success() {
            log::warn!("照合サービスがエラーを返しました: HTTP {}", status.as_u16());
            return Err(ScanError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let result = parse_match_response(&body)?;
        log::debug!("照合結果: {:?}", result);
        Ok(result)
    }
}

impl Matcher for MatchClient {
    fn submit(&self, image: ImageBytes) -> impl Future<Output = std::result::Result<MatchResult, ScanError>> + Send {
        async move { self.post_image(&image).await }
    }
}

fn network_error(e: reqwest::Error) -> ScanError {
    if e.is_timeout() {
        ScanError::Network(format!("タイムアウトしました: {}", e))
    } else {
        ScanError::Network(e.to_string())
    }
}
