//! tracing サブスクライバの初期化

use tracing_subscriber::EnvFilter;

/// 標準エラーへ出力するサブスクライバを登録する
///
/// `RUST_LOG` が設定されていればそれに従い、なければ `info`（verbose 時は `debug`）。
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // テストなどで二重登録された場合は無視する
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
