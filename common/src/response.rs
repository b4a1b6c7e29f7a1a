//! 照合サービスのリクエスト・レスポンス
//!
//! リクエスト: `{ "image": "<base64>" }`（data URIプレフィックスなし）
//! レスポンス: `{ "name": string, "similarity"?: number }`

use crate::error::ScanError;
use crate::types::MatchResult;
use serde::Serialize;

/// 照合リクエスト本文
#[derive(Debug, Clone, Serialize)]
pub struct MatchRequest<'a> {
    pub image: &'a str,
}

/// 2xxレスポンス本文をパース
///
/// # Returns
/// * `Ok(MatchResult)` - nameなし（null含む）も成功として返す
/// * `Err(ScanError::Decode)` - JSONでない、型が違う、類似度が範囲外
///
/// # Examples
/// ```
/// use card_scan_common::parse_match_response;
///
/// let result = parse_match_response(r#"{"name": "Shock", "similarity": 0.87}"#).unwrap();
/// assert_eq!(result.name.as_deref(), Some("Shock"));
/// ```
pub fn parse_match_response(body: &str) -> Result<MatchResult, ScanError> {
    let result: MatchResult = serde_json::from_str(body.trim())
        .map_err(|e| ScanError::Decode(e.to_string()))?;

    if let Some(similarity) = result.similarity {
        if !similarity.is_finite() || !(0.0..=1.0).contains(&similarity) {
            return Err(ScanError::Decode(format!(
                "similarityが範囲外です: {}",
                similarity
            )));
        }
    }

    Ok(result)
}
