//! スキャンループの状態機械
//!
//! タイマー・通信・ユーザー操作はすべて同じ実行コンテキストから
//! このコントローラを呼ぶ。時刻は引数で受け取り、副作用は `Effect` として返す。
//!
//! - 状態: Idle / Scanning
//! - ゲート: Open / InFlight / Cooldown
//!   リクエスト完了後もクールダウン終了まではゲートを閉じたままにする

use crate::error::ScanError;
use crate::library::{IdGenerator, LibraryStore};
use crate::types::{CardEntry, MatchResult};
use std::time::{Duration, Instant};

/// ポーリング間隔の既定値
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2500);
/// 完了後クールダウンの既定値
pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(3000);
/// 通知表示時間の既定値
pub const DEFAULT_NOTIFICATION: Duration = Duration::from_millis(2500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    Scanning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gate {
    Open,
    InFlight,
    Cooldown { until: Instant },
}

/// 状態遷移が呼び出し側に求める副作用
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// ライブラリに反映した
    Matched {
        entry: CardEntry,
        similarity: Option<f64>,
    },
    /// 効果音を1回鳴らす
    PlaySound,
    /// 一時通知を表示（表示中の通知は置き換え）
    Notify(String),
    /// 現在のエラーを表示
    Error(String),
    /// 表示中のエラーを消す
    ErrorCleared,
}

#[derive(Debug, Clone)]
struct Notification {
    text: String,
    expires_at: Instant,
}

/// 表示用のスナップショット
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSnapshot {
    pub state: ScanState,
    pub in_flight: bool,
    pub distinct_cards: usize,
    pub total_cards: u64,
    pub notification: Option<String>,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ScanController {
    state: ScanState,
    gate: Gate,
    cooldown: Duration,
    notification_duration: Duration,
    notification: Option<Notification>,
    last_error: Option<String>,
}

impl Default for ScanController {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN, DEFAULT_NOTIFICATION)
    }
}

impl ScanController {
    pub fn new(cooldown: Duration, notification_duration: Duration) -> Self {
        Self {
            state: ScanState::Idle,
            gate: Gate::Open,
            cooldown,
            notification_duration,
            notification: None,
            last_error: None,
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn is_scanning(&self) -> bool {
        self.state == ScanState::Scanning
    }

    /// リクエストが未完了か
    pub fn is_in_flight(&self) -> bool {
        self.gate == Gate::InFlight
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Idle → Scanning。すでにScanningならfalse
    pub fn start(&mut self) -> bool {
        self.note_user_action();
        if self.is_scanning() {
            return false;
        }
        self.state = ScanState::Scanning;
        true
    }

    /// Scanning → Idle。実行中のリクエストはそのまま完了させる
    pub fn stop(&mut self) -> bool {
        if !self.is_scanning() {
            return false;
        }
        self.state = ScanState::Idle;
        true
    }

    /// ユーザー操作で現在のエラーを消す
    pub fn note_user_action(&mut self) -> bool {
        self.last_error.take().is_some()
    }

    /// タイマーティック: 新しいサイクルを始めてよいか判定し、ゲートを閉じる
    pub fn try_begin_cycle(&mut self, now: Instant) -> bool {
        if !self.is_scanning() {
            return false;
        }

        match self.gate {
            Gate::InFlight => false,
            Gate::Cooldown { until } if now < until => false,
            Gate::Open | Gate::Cooldown { .. } => {
                self.gate = Gate::InFlight;
                true
            }
        }
    }

    /// 画像取得に失敗したサイクルを終える
    ///
    /// リクエストは送っていないのでクールダウンは入れない
    pub fn abort_cycle(&mut self, error: ScanError) -> Vec<Effect> {
        if self.gate == Gate::InFlight {
            self.gate = Gate::Open;
        }
        self.record_error(error)
    }

    /// リクエスト完了を反映
    ///
    /// Idleに戻った後に完了した結果も反映する
    pub fn settle<G: IdGenerator>(
        &mut self,
        now: Instant,
        outcome: Result<MatchResult, ScanError>,
        library: &mut LibraryStore<G>,
    ) -> Vec<Effect> {
        self.gate = Gate::Cooldown {
            until: now + self.cooldown,
        };

        match outcome {
            Ok(result) => self.apply_match(now, &result, library),
            Err(error) => self.record_error(error),
        }
    }

    /// ゲートと無関係に結果を反映（アップロード版）
    pub fn apply_match<G: IdGenerator>(
        &mut self,
        now: Instant,
        result: &MatchResult,
        library: &mut LibraryStore<G>,
    ) -> Vec<Effect> {
        let Some(name) = result.matched_name() else {
            return Vec::new();
        };

        let entry = match library.record_match(name) {
            Ok(entry) => entry.clone(),
            Err(e) => return self.record_error(ScanError::Decode(e.to_string())),
        };

        let mut effects = Vec::with_capacity(4);
        if self.last_error.take().is_some() {
            effects.push(Effect::ErrorCleared);
        }

        let text = match result.similarity {
            Some(similarity) => format!(
                "✔ {} (類似度 {:.0}%) 計{}枚",
                entry.name,
                similarity * 100.0,
                entry.quantity
            ),
            None => format!("✔ {} 計{}枚", entry.name, entry.quantity),
        };
        self.notification = Some(Notification {
            text: text.clone(),
            expires_at: now + self.notification_duration,
        });

        effects.push(Effect::Matched {
            entry,
            similarity: result.similarity,
        });
        effects.push(Effect::PlaySound);
        effects.push(Effect::Notify(text));
        effects
    }

    fn record_error(&mut self, error: ScanError) -> Vec<Effect> {
        let message = error.to_string();
        self.last_error = Some(message.clone());
        vec![Effect::Error(message)]
    }

    /// 表示中の通知（期限切れならNone）
    pub fn notification(&self, now: Instant) -> Option<&str> {
        self.notification
            .as_ref()
            .filter(|n| now < n.expires_at)
            .map(|n| n.text.as_str())
    }

    /// 通知の期限
    pub fn notification_deadline(&self) -> Option<Instant> {
        self.notification.as_ref().map(|n| n.expires_at)
    }

    /// 期限切れの通知を片付ける。消えたらtrue
    pub fn expire_notification(&mut self, now: Instant) -> bool {
        match &self.notification {
            Some(n) if now >= n.expires_at => {
                self.notification = None;
                true
            }
            _ => false,
        }
    }

    pub fn snapshot<G>(&self, now: Instant, library: &LibraryStore<G>) -> StatusSnapshot {
        StatusSnapshot {
            state: self.state,
            in_flight: self.is_in_flight(),
            distinct_cards: library.len(),
            total_cards: library.total_cards(),
            notification: self.notification(now).map(str::to_string),
            last_error: self.last_error.clone(),
        }
    }
}
