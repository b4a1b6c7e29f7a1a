use crate::error::{CardScanError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 照合エンドポイントを上書きする環境変数
pub const ENDPOINT_ENV: &str = "CARD_SCAN_ENDPOINT";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub endpoint: String,
    pub poll_interval_ms: u64,
    pub cooldown_ms: u64,
    pub timeout_seconds: u64,
    pub notification_ms: u64,
    /// 照合成功時に鳴らす効果音
    pub sound_file: Option<PathBuf>,
    /// 効果音の再生コマンド（例: aplay, afplay）。未設定ならターミナルベル
    pub sound_command: Option<String>,
    /// CSVの出力先（未指定ならカレント）
    pub output_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8000/match".into(),
            poll_interval_ms: 2500,
            cooldown_ms: 3000,
            timeout_seconds: 30,
            notification_ms: 2500,
            sound_file: None,
            sound_command: None,
            output_dir: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// 指定パスから読み込み。ファイルがなければ既定値
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CardScanError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("card-scan").join("config.json"))
    }

    fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            return Err(CardScanError::Config("poll_interval_ms は1以上にしてください".into()));
        }
        if self.timeout_seconds == 0 {
            return Err(CardScanError::Config("timeout_seconds は1以上にしてください".into()));
        }
        Ok(())
    }

    pub fn endpoint(&self) -> String {
        // 環境変数を優先
        match std::env::var(ENDPOINT_ENV) {
            Ok(url) if !url.trim().is_empty() => url,
            _ => self.endpoint.clone(),
        }
    }

    pub fn set_endpoint(&mut self, url: String) -> Result<()> {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(CardScanError::Config(format!("URLが不正です: {}", url)));
        }
        self.endpoint = url;
        self.save()
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn notification_duration(&self) -> Duration {
        Duration::from_millis(self.notification_ms)
    }
}
