//! kanakanji: ひらがなのフレーズ一覧を IME で一括変換する CLI。
//! 常駐した AutoHotkey スクリプトへ 1 行ずつ送り、結果を同じ順序で出力ファイルへ書き出します。
use clap::Parser;
use kanakanji::application::batch::{BatchJob, BatchSummary, run_batch};
use kanakanji::error::{Result, print_fatal};
use kanakanji::infrastructure::external::persistent_session::{
    DEFAULT_RESPONSE_TIMEOUT, SessionOptions,
};
use kanakanji::infrastructure::locator::{AutomationScript, locate_interpreter};
use kanakanji::utils::{config::EnvConfig, env::load_env, logging::init_tracing};
use std::process::ExitCode;

mod cli;

use cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    load_env();
    EnvConfig::init();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(summary) => {
            println!("Changed: {}/{}", summary.changed, summary.total);
            ExitCode::SUCCESS
        }
        Err(e) => {
            print_fatal(&e);
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli) -> Result<BatchSummary> {
    let config = EnvConfig::get();

    // 変換を始める前に依存ファイルをすべて確認する
    let interpreter = locate_interpreter(config.ahk_path.as_deref())?;
    let script = AutomationScript::resolve(&cli.ahk_script, &cli.companion)?;
    tracing::info!("AutoHotkey: {}", interpreter.display());
    tracing::debug!("Companion library: {}", script.companion().display());

    let options = SessionOptions {
        settle_ms: cli.sleep_convert,
        response_timeout: config.response_timeout.unwrap_or(DEFAULT_RESPONSE_TIMEOUT),
        echo_diagnostics: cli.verbose,
        ..SessionOptions::default()
    };
    let job = BatchJob {
        input: cli.input_file,
        output: cli.output,
    };
    run_batch(&interpreter, &script, &job, options).await
}
