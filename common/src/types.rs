//! カード・照合結果の型定義
//!
//! CLIと将来のフロントエンドで共有される型:
//! - CardEntry: ライブラリの1行
//! - MatchResult: 照合サービスのレスポンス

use serde::{Deserialize, Serialize};

/// ライブラリの1行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardEntry {
    /// カード名（空でない）
    pub name: String,

    /// 生成時に払い出される一意なID
    pub id: String,

    /// 枚数（ライブラリ内では常に1以上）
    pub quantity: u32,
}

/// 照合サービスのレスポンス
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// カード名。Noneは「確信度の高い一致なし」
    #[serde(default)]
    pub name: Option<String>,

    /// 類似度 (0.0-1.0)。アップロード版のみ
    #[serde(default)]
    pub similarity: Option<f64>,
}

impl MatchResult {
    /// ライブラリに反映すべきカード名
    ///
    /// 空文字・空白のみの名前は一致なしとして扱う
    pub fn matched_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }
}
