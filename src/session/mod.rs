//! ポーリングスキャンセッション
//!
//! 1つのタスクで select! し、以下を順番に処理する:
//! - ポーリングタイマー（スキャン中のみ）
//! - 照合タスクからの完了通知（同時に1件まで）
//! - ユーザーコマンド
//! - 通知の期限切れ
//!
//! ライブラリを触るのはこのタスクだけなので、反映順は完了順（＝開始順）になる

pub mod input;
pub mod terminal;

pub use input::{parse_command, spawn_stdin_reader, UserCommand, HELP};
pub use terminal::TerminalFeedback;

use crate::capture::{CaptureSource, ImageBytes};
use crate::config::Config;
use crate::error::Result;
use crate::export;
use crate::matcher::Matcher;
use card_scan_common::{
    Adjusted, Effect, LibraryStore, MatchResult, ScanController, ScanError, StatusSnapshot,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

type Outcome = std::result::Result<MatchResult, ScanError>;

/// 表示・効果音など、セッションの外側への出力
pub trait Feedback {
    fn on_effect(&mut self, effect: &Effect);
    fn on_status(&mut self, status: &StatusSnapshot);
    fn on_library(&mut self, library: &LibraryStore);
    fn on_message(&mut self, message: &str);
}

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub poll_interval: Duration,
    pub cooldown: Duration,
    pub notification_duration: Duration,
    /// CSVの出力先
    pub output: PathBuf,
    /// 起動直後からスキャンする
    pub autostart: bool,
    /// 終了時にCSVを書き出す
    pub export_on_exit: bool,
}

impl SessionSettings {
    pub fn from_config(config: &Config, output: PathBuf) -> Self {
        Self {
            poll_interval: config.poll_interval(),
            cooldown: config.cooldown(),
            notification_duration: config.notification_duration(),
            output,
            autostart: false,
            export_on_exit: false,
        }
    }
}

fn now() -> std::time::Instant {
    Instant::now().into_std()
}

/// 最初のティックは開始から1周期後
fn new_ticker(period: Duration) -> Interval {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

fn spawn_match<M: Matcher>(matcher: &Arc<M>, image: ImageBytes, settled: &mpsc::Sender<Outcome>) {
    let matcher = Arc::clone(matcher);
    let settled = settled.clone();
    tokio::spawn(async move {
        let outcome = matcher.submit(image).await;
        if settled.send(outcome).await.is_err() {
            log::debug!("セッション終了後に照合が完了しました");
        }
    });
}

/// 状態遷移が返した効果を順番に出力へ渡す
pub fn deliver_effects<F: Feedback>(feedback: &mut F, effects: &[Effect]) {
    for effect in effects {
        feedback.on_effect(effect);
    }
}

/// セッションを実行し、終了時のライブラリを返す
///
/// 個々のサイクルの失敗はエラー表示になるだけで、セッションは止まらない
pub async fn run_scan_session<C, M, F>(
    capture: &mut C,
    matcher: Arc<M>,
    settings: &SessionSettings,
    commands: &mut mpsc::Receiver<UserCommand>,
    feedback: &mut F,
) -> Result<LibraryStore>
where
    C: CaptureSource,
    M: Matcher,
    F: Feedback,
{
    let mut controller = ScanController::new(settings.cooldown, settings.notification_duration);
    let mut library = LibraryStore::new();
    let (settled_tx, mut settled_rx) = mpsc::channel::<Outcome>(1);
    let mut ticker = new_ticker(settings.poll_interval);

    if settings.autostart {
        controller.start();
        log::info!("スキャン開始 (間隔 {:?}, クールダウン {:?})", settings.poll_interval, settings.cooldown);
    }
    feedback.on_status(&controller.snapshot(now(), &library));

    loop {
        let notification_deadline = controller.notification_deadline().map(Instant::from_std);

        tokio::select! {
            _ = ticker.tick(), if controller.is_scanning() => {
                if controller.try_begin_cycle(now()) {
                    match capture.capture_still() {
                        Ok(image) => spawn_match(&matcher, image, &settled_tx),
                        Err(error) => {
                            log::debug!("画像取得失敗: {}", error);
                            deliver_effects(feedback, &controller.abort_cycle(error));
                        }
                    }
                } else {
                    log::trace!("照合中またはクールダウン中のためスキップ");
                }
            }
            Some(outcome) = settled_rx.recv() => {
                deliver_effects(feedback, &controller.settle(now(), outcome, &mut library));
            }
            _ = time::sleep_until(notification_deadline.unwrap_or_else(Instant::now)), if notification_deadline.is_some() => {
                controller.expire_notification(now());
            }
            command = commands.recv() => {
                match command {
                    None | Some(UserCommand::Quit) => break,
                    Some(command) => {
                        handle_command(command, &mut controller, &mut library, &mut ticker, settings, feedback);
                    }
                }
            }
        }

        feedback.on_status(&controller.snapshot(now(), &library));
    }

    // 停止しても実行中のリクエストは取り消さず、結果を反映してから終わる
    if controller.is_in_flight() {
        feedback.on_message("照合結果を待っています...");
        if let Some(outcome) = settled_rx.recv().await {
            deliver_effects(feedback, &controller.settle(now(), outcome, &mut library));
        }
    }
    controller.stop();

    if settings.export_on_exit && !library.is_empty() {
        let path = export::export_library(&library, &settings.output)?;
        feedback.on_message(&format!("✔ CSV出力: {}", path.display()));
    }

    Ok(library)
}

fn handle_command<F: Feedback>(
    command: UserCommand,
    controller: &mut ScanController,
    library: &mut LibraryStore,
    ticker: &mut Interval,
    settings: &SessionSettings,
    feedback: &mut F,
) {
    if controller.note_user_action() {
        feedback.on_effect(&Effect::ErrorCleared);
    }

    match command {
        UserCommand::Start => {
            if controller.start() {
                ticker.reset();
                log::info!("スキャン開始");
                feedback.on_message("▶ スキャンを開始しました");
            } else {
                feedback.on_message("すでにスキャン中です");
            }
        }
        UserCommand::Stop => {
            if controller.stop() {
                log::info!("スキャン停止");
                feedback.on_message("■ スキャンを停止しました");
            } else {
                feedback.on_message("スキャンしていません");
            }
        }
        UserCommand::List => feedback.on_library(library),
        UserCommand::Adjust { id, delta } => match library.adjust_quantity(&id, delta) {
            Some(Adjusted::Updated(entry)) => {
                feedback.on_message(&format!("{} x{}", entry.name, entry.quantity));
            }
            Some(Adjusted::Removed(entry)) => {
                feedback.on_message(&format!("{} を削除しました", entry.name));
            }
            None => feedback.on_message(&format!("IDが見つかりません: {}", id)),
        },
        UserCommand::Remove { id } => match library.remove(&id) {
            Some(entry) => feedback.on_message(&format!("{} を削除しました", entry.name)),
            None => feedback.on_message(&format!("IDが見つかりません: {}", id)),
        },
        UserCommand::Export => match export::export_library(library, &settings.output) {
            Ok(path) => feedback.on_message(&format!("✔ CSV出力: {}", path.display())),
            Err(e) => {
                log::warn!("CSV出力エラー: {}", e);
                feedback.on_message(&format!("⚠ CSV出力エラー: {}", e));
            }
        },
        UserCommand::Help => feedback.on_message(HELP),
        UserCommand::Quit => {}
    }
}
