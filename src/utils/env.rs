//! `.env` ファイルの読み込み
//!
//! `EnvConfig` を初期化する前に呼び、ファイル内の値をプロセス環境へ反映する。

use super::config::EnvConfig;
use std::path::{Path, PathBuf};

/// 既定の `.env`、または `KANAKANJI_ENV_PATH` で指定されたファイルを読み込む
///
/// ファイルが無い・読めない場合は何もしない。
pub fn load_env() -> Option<PathBuf> {
    // グローバル設定はまだ初期化しない（.env の値を反映させるため）
    let requested = EnvConfig::from_env().env_path;
    load_env_file(requested.as_deref().map(Path::new))
}

/// 読み込んだファイルのパスを返す
pub fn load_env_file(path: Option<&Path>) -> Option<PathBuf> {
    match path {
        Some(path) => dotenvy::from_path(path).ok().map(|()| path.to_path_buf()),
        None => dotenvy::dotenv().ok(),
    }
}
