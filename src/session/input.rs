//! セッション中の標準入力コマンド

use std::io::BufRead;
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    Start,
    Stop,
    List,
    Adjust { id: String, delta: i64 },
    Remove { id: String },
    Export,
    Help,
    Quit,
}

pub const HELP: &str =
    "操作: start | stop | list | +[N] ID | -[N] ID | rm ID | export | help | quit";

/// 1行をコマンドに変換。空行はNone
///
/// IDはカード名を含み空白を持ちうるので、先頭語より後ろの残り全体をIDとする。
/// 枚数は符号に続けて書く (`+3 Lightning Bolt-1`)
pub fn parse_command(line: &str) -> Result<Option<UserCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    let command = match (head.to_lowercase().as_str(), rest) {
        ("start" | "s", "") => UserCommand::Start,
        ("stop" | "p", "") => UserCommand::Stop,
        ("list" | "ls", "") => UserCommand::List,
        ("export" | "e", "") => UserCommand::Export,
        ("help" | "?" | "h", "") => UserCommand::Help,
        ("quit" | "q" | "exit", "") => UserCommand::Quit,
        ("rm" | "remove", id) if !id.is_empty() => UserCommand::Remove { id: id.to_string() },
        (sign, id) if sign.starts_with(['+', '-']) => parse_adjust(sign, id)?,
        _ => return Err(format!("不明なコマンド: {}\n{}", line, HELP)),
    };

    Ok(Some(command))
}

fn parse_adjust(sign: &str, id: &str) -> Result<UserCommand, String> {
    let (direction, amount) = sign.split_at(1);
    let amount = if amount.is_empty() {
        1
    } else {
        amount
            .parse::<i64>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| format!("枚数が不正です: {}", amount))?
    };
    if id.is_empty() {
        return Err(format!("IDを指定してください: {} ID", sign));
    }

    let delta = if direction == "+" { amount } else { -amount };
    Ok(UserCommand::Adjust {
        id: id.to_string(),
        delta,
    })
}

/// 標準入力を読むスレッドを起動
///
/// 端末入力はブロッキングなので専用スレッドで読む（ランタイム終了を妨げない）。
/// 不正な行はその場で表示して読み飛ばす。EOFでQuitを送る
pub fn spawn_stdin_reader(tx: mpsc::Sender<UserCommand>) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    log::warn!("標準入力の読み込みエラー: {}", e);
                    break;
                }
            };

            match parse_command(&line) {
                Ok(Some(command)) => {
                    let quit = command == UserCommand::Quit;
                    if tx.blocking_send(command).is_err() || quit {
                        return;
                    }
                }
                Ok(None) => {}
                Err(message) => eprintln!("{}", message),
            }
        }
        let _ = tx.blocking_send(UserCommand::Quit);
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse_command("start"), Ok(Some(UserCommand::Start)));
        assert_eq!(parse_command("  STOP "), Ok(Some(UserCommand::Stop)));
        assert_eq!(parse_command("ls"), Ok(Some(UserCommand::List)));
        assert_eq!(parse_command("e"), Ok(Some(UserCommand::Export)));
        assert_eq!(parse_command("q"), Ok(Some(UserCommand::Quit)));
    }

    #[test]
    fn test_empty_line() {
        assert_eq!(parse_command(""), Ok(None));
        assert_eq!(parse_command("   "), Ok(None));
    }

    #[test]
    fn test_adjust() {
        assert_eq!(
            parse_command("+ Shock-1"),
            Ok(Some(UserCommand::Adjust {
                id: "Shock-1".into(),
                delta: 1
            }))
        );
        assert_eq!(
            parse_command("-3 Shock-1"),
            Ok(Some(UserCommand::Adjust {
                id: "Shock-1".into(),
                delta: -3
            }))
        );
    }

    #[test]
    fn test_adjust_invalid_amount() {
        assert!(parse_command("+abc Shock-1").is_err());
        assert!(parse_command("-0 Shock-1").is_err());
        assert!(parse_command("+-2 Shock-1").is_err());
        assert!(parse_command("+").is_err());
        assert!(parse_command("-2").is_err());
    }

    #[test]
    fn test_remove() {
        assert_eq!(
            parse_command("rm Bolt-2"),
            Ok(Some(UserCommand::Remove { id: "Bolt-2".into() }))
        );
        assert!(parse_command("rm").is_err());
    }

    #[test]
    fn test_ids_with_spaces() {
        let mut library = card_scan_common::LibraryStore::new();
        let id = library.record_match("Lightning Bolt").unwrap().id.clone();
        assert_eq!(id, "Lightning Bolt-1");

        assert_eq!(
            parse_command(&format!("+ {}", id)),
            Ok(Some(UserCommand::Adjust {
                id: id.clone(),
                delta: 1
            }))
        );
        assert_eq!(
            parse_command(&format!("-2 {}", id)),
            Ok(Some(UserCommand::Adjust {
                id: id.clone(),
                delta: -2
            }))
        );
        assert_eq!(
            parse_command(&format!("rm  {} ", id)),
            Ok(Some(UserCommand::Remove { id: id.clone() }))
        );
        assert_eq!(
            parse_command("remove Kongming, \"Sleeping Dragon\"-3"),
            Ok(Some(UserCommand::Remove {
                id: "Kongming, \"Sleeping Dragon\"-3".into()
            }))
        );
    }

    #[test]
    fn test_extra_words_rejected_for_plain_commands() {
        assert!(parse_command("start now").is_err());
        assert!(parse_command("list all").is_err());
    }

    #[test]
    fn test_unknown() {
        let err = parse_command("dance").unwrap_err();
        assert!(err.contains("dance"));
        assert!(err.contains("start"));
    }
}
