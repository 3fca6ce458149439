use clap::Parser;
use std::path::PathBuf;

/// 既定の自動化スクリプト
pub const DEFAULT_BATCH_SCRIPT: &str = "kanakanji.ahk";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "IMEを使用してひらがなを漢字に変換するツール"
)]
pub struct Cli {
    /// 入力ファイル（ひらがな、1行1フレーズ）
    pub input_file: PathBuf,

    /// 出力ファイル（変換結果）
    #[arg(short, long)]
    pub output: PathBuf,

    /// AutoHotkeyスクリプトのパス
    #[arg(long, default_value = DEFAULT_BATCH_SCRIPT)]
    pub ahk_script: PathBuf,

    /// スクリプトと同じディレクトリに置く付属ライブラリ名
    #[arg(long, default_value = kanakanji::infrastructure::locator::DEFAULT_COMPANION)]
    pub companion: String,

    /// 変換キー送出後の待機時間（ミリ秒）。未指定ならスクリプトの既定値
    #[arg(long, value_name = "MILLISECONDS")]
    pub sleep_convert: Option<u64>,

    /// 診断行とデバッグログを表示
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}
