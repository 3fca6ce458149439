//! グローバル環境変数設定
//!
//! アプリケーション全体で使用する環境変数を一元管理。
//! プロセス起動時に一度だけ初期化し、以降はどこからでもアクセス可能。

use once_cell::sync::OnceCell;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// グローバル環境変数設定
static ENV_CONFIG: OnceCell<Arc<EnvConfig>> = OnceCell::new();

/// 環境変数設定
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    /// AutoHotkey 実行ファイルの明示指定 (`KANAKANJI_AHK_PATH`)
    pub ahk_path: Option<PathBuf>,
    /// 常駐セッションの応答待ち秒数 (`KANAKANJI_RESPONSE_TIMEOUT_SECS`)
    pub response_timeout: Option<Duration>,
    /// XDG Data Home ディレクトリ
    pub xdg_data_home: Option<String>,
    /// 読み込む `.env` ファイルのパス (`KANAKANJI_ENV_PATH`)
    pub env_path: Option<String>,
}

impl EnvConfig {
    /// 環境変数から設定を読み取る
    pub fn from_env() -> Self {
        EnvConfig {
            ahk_path: env_value("KANAKANJI_AHK_PATH").map(PathBuf::from),
            response_timeout: env_value("KANAKANJI_RESPONSE_TIMEOUT_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs),
            xdg_data_home: env_value("XDG_DATA_HOME"),
            env_path: env_value("KANAKANJI_ENV_PATH"),
        }
    }

    /// 環境変数から設定を初期化
    ///
    /// アプリケーション起動時に呼び出す。
    /// 既に初期化済みの場合は何もしない（冪等）。
    pub fn init() {
        let _ = ENV_CONFIG.get_or_init(|| Arc::new(EnvConfig::from_env()));
    }

    /// 設定を取得（未初期化なら環境変数から初期化する）
    pub fn get() -> Arc<EnvConfig> {
        ENV_CONFIG
            .get_or_init(|| Arc::new(EnvConfig::from_env()))
            .clone()
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
