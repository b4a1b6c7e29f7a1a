//! 照合成功時の効果音
//!
//! 再生に失敗してもスキャンは止めない

use crate::config::Config;
use std::io::Write;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

#[derive(Debug, Clone, Default)]
pub struct SoundPlayer {
    command: Option<String>,
    sound_file: Option<PathBuf>,
}

impl SoundPlayer {
    pub fn new(command: Option<String>, sound_file: Option<PathBuf>) -> Self {
        Self {
            command,
            sound_file,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.sound_command.clone(), config.sound_file.clone())
    }

    /// 1回鳴らす。再生コマンドの終了は待たない
    ///
    /// tokioランタイム内から呼ぶこと
    pub fn play(&self) {
        let Some(program) = self.command.as_deref() else {
            ring_bell();
            return;
        };

        let mut command = Command::new(program);
        if let Some(file) = &self.sound_file {
            command.arg(file);
        }
        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        match command.spawn() {
            Ok(_child) => log::debug!("効果音を再生: {}", program),
            Err(e) => log::warn!("効果音を再生できません ({}): {}", program, e),
        }
    }
}

fn ring_bell() {
    let mut stderr = std::io::stderr();
    if let Err(e) = stderr.write_all(b"\x07").and_then(|_| stderr.flush()) {
        log::warn!("ベルを鳴らせません: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_player_is_not_fatal() {
        let player = SoundPlayer::new(
            Some("card-scan-no-such-player".to_string()),
            Some(PathBuf::from("ding.wav")),
        );
        player.play();
    }

    #[test]
    fn test_from_config() {
        let config = Config {
            sound_command: Some("aplay".into()),
            sound_file: Some(PathBuf::from("ding.wav")),
            ..Config::default()
        };
        let player = SoundPlayer::from_config(&config);
        assert_eq!(player.command.as_deref(), Some("aplay"));
        assert_eq!(player.sound_file, Some(PathBuf::from("ding.wav")));
    }
}
