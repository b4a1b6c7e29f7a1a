use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "card-scan")]
#[command(about = "トレーディングカード画像照合・ライブラリ集計ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 照合エンドポイント（設定ファイル・環境変数より優先）
    #[arg(long, global = true)]
    pub endpoint: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// カメラのフレームファイルを定期的に照合（対話モード）
    Scan {
        /// カメラツールが上書きし続けるフレーム画像
        #[arg(short, long, required = true)]
        frame: PathBuf,

        /// ポーリング間隔（ミリ秒）
        #[arg(long)]
        interval_ms: Option<u64>,

        /// 照合完了後のクールダウン（ミリ秒）
        #[arg(long)]
        cooldown_ms: Option<u64>,

        /// CSVの出力先（ファイルまたはディレクトリ）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 起動直後からスキャンを開始
        #[arg(long)]
        autostart: bool,

        /// 終了時にCSVを書き出す
        #[arg(long)]
        export_on_exit: bool,
    },

    /// 画像ファイル1枚を照合
    Identify {
        /// カード画像 (jpg/jpeg/png)
        #[arg(required = true)]
        image: PathBuf,

        /// 照合結果をCSVに書き出す
        #[arg(long)]
        export: bool,

        /// CSVの出力先（ファイルまたはディレクトリ）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// フォルダ内の画像をまとめて照合しCSVを出力
    Batch {
        /// カード画像フォルダのパス
        #[arg(required = true)]
        folder: PathBuf,

        /// サブフォルダも再帰的にスキャン
        #[arg(short = 'r', long)]
        recursive: bool,

        /// CSVの出力先（デフォルト: 入力フォルダ）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// 照合エンドポイントを設定
        #[arg(long)]
        set_endpoint: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
