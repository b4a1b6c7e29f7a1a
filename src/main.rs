use card_scan::{capture, cli, config, error, export, feedback, matcher, scanner, session, upload};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use feedback::SoundPlayer;
use indicatif::{ProgressBar, ProgressStyle};
use matcher::MatchClient;
use session::{SessionSettings, TerminalFeedback};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

fn init_logger(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let mut config = Config::load()?;
    let endpoint = cli.endpoint.clone().unwrap_or_else(|| config.endpoint());

    match cli.command {
        Commands::Scan { frame, interval_ms, cooldown_ms, output, autostart, export_on_exit } => {
            println!("🃏 card-scan - スキャン\n");

            if let Some(ms) = interval_ms {
                config.poll_interval_ms = ms.max(1);
            }
            if let Some(ms) = cooldown_ms {
                config.cooldown_ms = ms;
            }

            let output = output
                .or_else(|| config.output_dir.clone())
                .unwrap_or_else(|| PathBuf::from("."));
            let mut settings = SessionSettings::from_config(&config, output);
            settings.autostart = autostart;
            settings.export_on_exit = export_on_exit;

            let matcher = Arc::new(MatchClient::new(&endpoint, config.timeout())?);
            println!("- フレーム: {}", frame.display());
            println!("- 照合先: {}", endpoint);
            println!("{}\n", session::HELP);

            let (tx, mut rx) = mpsc::channel(16);
            let _reader = session::spawn_stdin_reader(tx);

            let mut capture = capture::FrameSource::new(frame);
            let mut feedback = TerminalFeedback::new(SoundPlayer::from_config(&config));
            let library = session::run_scan_session(&mut capture, matcher, &settings, &mut rx, &mut feedback).await;
            feedback.finish();
            let library = library?;

            println!("\n✅ 終了: {}種類 / {}枚", library.len(), library.total_cards());
        }

        Commands::Identify { image, export: write_csv, output } => {
            println!("🃏 card-scan - 画像照合\n");

            if !image.exists() {
                return Err(error::CardScanError::FileNotFound(image.display().to_string()));
            }

            let matcher = MatchClient::new(&endpoint, config.timeout())?;
            let mut controller = card_scan_common::ScanController::default();
            let mut library = card_scan_common::LibraryStore::new();

            let identified = upload::identify_image(&image, &matcher, &mut controller, &mut library).await?;
            println!("📷 {} ({}x{})", identified.file_name, identified.width, identified.height);

            if identified.is_match() {
                let mut feedback = TerminalFeedback::new(SoundPlayer::from_config(&config));
                session::deliver_effects(&mut feedback, &identified.effects);
                feedback.finish();

                if write_csv {
                    let output = output
                        .or_else(|| config.output_dir.clone())
                        .unwrap_or_else(|| PathBuf::from("."));
                    let path = export::export_library(&library, &output)?;
                    println!("✔ CSV出力: {}", path.display());
                }
            } else {
                println!("一致するカードが見つかりませんでした");
            }
        }

        Commands::Batch { folder, recursive, output } => {
            println!("🃏 card-scan - 一括照合\n");

            // 1. 画像スキャン
            println!("[1/3] 画像をスキャン中...");
            let images = scanner::scan_folder(&folder, recursive)?;
            println!("✔ {}枚の画像を検出\n", images.len());

            if images.is_empty() {
                return Err(error::CardScanError::NoImagesFound(folder.display().to_string()));
            }

            // 2. 照合（1枚ずつ）
            println!("[2/3] 照合中...");
            let matcher = MatchClient::new(&endpoint, config.timeout())?;
            let progress = ProgressBar::new(images.len() as u64);
            if let Ok(style) = ProgressStyle::with_template("  {bar:30.cyan/blue} {pos}/{len} {msg}") {
                progress.set_style(style);
            }
            let summary = upload::run_batch(&images, &matcher, &progress).await;
            progress.finish_and_clear();
            println!(
                "✔ 一致 {}枚 / 一致なし {}枚 / エラー {}枚\n",
                summary.matched,
                summary.unmatched.len(),
                summary.failed.len()
            );

            // 3. CSV出力
            println!("[3/3] CSVを出力中...");
            let output_dir = output.unwrap_or_else(|| folder.clone());
            let path = export::export_library(&summary.library, &output_dir)?;
            println!("✔ CSV出力: {}", path.display());

            println!(
                "\n✅ 完了: {}種類 / {}枚",
                summary.library.len(),
                summary.library.total_cards()
            );
        }

        Commands::Config { set_endpoint, show } => {
            if let Some(url) = set_endpoint {
                config.set_endpoint(url)?;
                println!("✔ 照合エンドポイントを設定しました");
            }

            if show {
                println!("設定:");
                println!("  照合先: {}", config.endpoint());
                println!("  ポーリング間隔: {}ms", config.poll_interval_ms);
                println!("  クールダウン: {}ms", config.cooldown_ms);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  通知表示: {}ms", config.notification_ms);
                println!(
                    "  効果音: {}",
                    config
                        .sound_file
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "ターミナルベル".into())
                );
                if let Ok(path) = Config::config_path() {
                    println!("  設定ファイル: {}", path.display());
                }
            }
        }
    }

    Ok(())
}

