//! ターミナル表示
//!
//! ステータス行はスピナー、照合結果・エラー・一覧はその上に流す

use super::Feedback;
use crate::feedback::SoundPlayer;
use card_scan_common::{Effect, LibraryStore, ScanState, StatusSnapshot};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub struct TerminalFeedback {
    bar: ProgressBar,
    sound: SoundPlayer,
}

impl TerminalFeedback {
    pub fn new(sound: SoundPlayer) -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("  {spinner:.cyan} {msg}") {
            bar.set_style(style.tick_chars("/-\\|"));
        }
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { bar, sound }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Feedback for TerminalFeedback {
    fn on_effect(&mut self, effect: &Effect) {
        match effect {
            Effect::Matched { entry, similarity } => {
                let score = similarity
                    .map(|s| format!(" 類似度 {:.1}%", s * 100.0))
                    .unwrap_or_default();
                self.bar.println(format!(
                    "✔ {} x{}{} (ID: {})",
                    entry.name, entry.quantity, score, entry.id
                ));
            }
            Effect::PlaySound => self.sound.play(),
            // 通知はステータス行に出る
            Effect::Notify(_) | Effect::ErrorCleared => {}
            Effect::Error(message) => self.bar.println(format!("⚠ {}", message)),
        }
    }

    fn on_status(&mut self, status: &StatusSnapshot) {
        self.bar.set_message(render_status(status));
    }

    fn on_library(&mut self, library: &LibraryStore) {
        for line in render_library(library) {
            self.bar.println(line);
        }
    }

    fn on_message(&mut self, message: &str) {
        self.bar.println(message);
    }
}

pub fn render_status(status: &StatusSnapshot) -> String {
    let state = match (status.state, status.in_flight) {
        (ScanState::Scanning, true) => "照合中",
        (ScanState::Scanning, false) => "スキャン中",
        (ScanState::Idle, true) => "停止 (照合待ち)",
        (ScanState::Idle, false) => "停止",
    };

    let mut line = format!(
        "[{}] {}種類 / {}枚",
        state, status.distinct_cards, status.total_cards
    );
    if let Some(text) = &status.notification {
        line.push_str(" | ");
        line.push_str(text);
    }
    if let Some(error) = &status.last_error {
        line.push_str(" | ⚠ ");
        line.push_str(error);
    }
    line
}

pub fn render_library(library: &LibraryStore) -> Vec<String> {
    if library.is_empty() {
        return vec!["ライブラリは空です".to_string()];
    }

    let width = library
        .entries()
        .iter()
        .map(|e| e.id.chars().count())
        .max()
        .unwrap_or(0);

    let mut lines: Vec<String> = library
        .entries()
        .iter()
        .map(|e| format!("  {:<width$}  x{:<3} {}", e.id, e.quantity, e.name, width = width))
        .collect();
    lines.push(format!(
        "  合計: {}種類 / {}枚",
        library.len(),
        library.total_cards()
    ));
    lines
}
