//! 統一エラーハンドリング
//!
//! kanakanji 全体で使用するエラー型を定義します。
//! 依存ファイルの欠落は変換開始前に検出し、オペレーター向けの対処方法を添えて報告します。

use std::path::PathBuf;
use thiserror::Error;

/// AutoHotkey のダウンロード案内
pub const AUTOHOTKEY_DOWNLOAD_URL: &str = "https://www.autohotkey.com/";

/// kanakanji 全体で使用する統一エラー型
#[derive(Debug, Error)]
pub enum ConverterError {
    // ========================================
    // 依存ファイル関連エラー（変換前に検出）
    // ========================================
    #[error("AutoHotkey interpreter not found")]
    MissingInterpreter,

    #[error("Automation script not found: {}", .0.display())]
    MissingScript(PathBuf),

    #[error("Companion library not found: {}", .0.display())]
    MissingCompanion(PathBuf),

    #[error("Input file could not be read: {}: {source}", path.display())]
    MissingInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Input file contains no phrases: {}", .0.display())]
    EmptyInput(PathBuf),

    // ========================================
    // 子プロセス関連エラー
    // ========================================
    #[error("Failed to spawn {}: {source}", program.display())]
    SpawnFailed {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Automation process timed out after {0:?}")]
    ChildTimeout(std::time::Duration),

    #[error("Automation process I/O error: {0}")]
    ChildIo(#[from] std::io::Error),

    #[error("Automation process closed its output before answering")]
    ChildClosed,

    #[error("Automation script reported an error: {0}")]
    ConversionRejected(String),

    // ========================================
    // 出力・設定関連エラー
    // ========================================
    #[error("Failed to write {}: {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Console I/O error: {0}")]
    Console(#[source] std::io::Error),

    #[error("Report error: {0}")]
    Report(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// 統一Result型エイリアス
pub type Result<T> = std::result::Result<T, ConverterError>;

// ========================================
// ヘルパー関数
// ========================================

impl ConverterError {
    /// 1 単語単位の再試行で回復し得るかどうか
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ConverterError::SpawnFailed { .. }
                | ConverterError::ChildTimeout(_)
                | ConverterError::ChildIo(_)
                | ConverterError::ChildClosed
                | ConverterError::ConversionRejected(_)
        )
    }

    /// エラーがユーザーアクションで解決可能かどうかを判定
    pub fn is_user_actionable(&self) -> bool {
        matches!(
            self,
            ConverterError::MissingInterpreter
                | ConverterError::MissingScript(_)
                | ConverterError::MissingCompanion(_)
                | ConverterError::MissingInput { .. }
                | ConverterError::EmptyInput(_)
                | ConverterError::Config(_)
        )
    }

    /// オペレーター向けの対処方法
    pub fn remediation(&self) -> Option<String> {
        match self {
            ConverterError::MissingInterpreter => Some(format!(
                "Install AutoHotkey from {AUTOHOTKEY_DOWNLOAD_URL} or set KANAKANJI_AHK_PATH"
            )),
            ConverterError::MissingScript(path) => Some(format!(
                "Place {} in the working directory or pass its path explicitly",
                path.display()
            )),
            ConverterError::MissingCompanion(path) => Some(format!(
                "Place {} next to the automation script",
                path.display()
            )),
            ConverterError::EmptyInput(_) => {
                Some("Write one hiragana phrase per line".to_string())
            }
            _ => None,
        }
    }
}

/// 致命的エラーの表示文
///
/// ユーザーが対処できるエラーには対処方法を、それ以外には詳細ログの出し方を添える。
pub fn fatal_message(error: &ConverterError) -> String {
    let hint = if error.is_user_actionable() {
        error.remediation()
    } else {
        Some("Set RUST_LOG=debug for details".to_string())
    };
    match hint {
        Some(hint) => format!("Error: {}\n  {}", error, hint),
        None => format!("Error: {}", error),
    }
}

/// 致命的エラーを標準エラーへ表示する
pub fn print_fatal(error: &ConverterError) {
    eprintln!("{}", fatal_message(error));
    tracing::debug!("fatal error: {:?}", error);
}
