//! ime_compare: 複数の IME の変換成功率を比較する対話型テストハーネス
//!
//! # 概要
//! IME ごとにオペレーターへ切替を依頼し、単語ごとに AutoHotkey を 1 回ずつ起動して
//! 変換結果を集めます。全結果は `ime_comparison_<YYYYMMDD_HHMMSS>.csv` に保存し、
//! `analyze_ime_results.R` があれば統計解析の実行を確認します。
//!
//! Ctrl-C で中断した場合、CSV は保存されません。

use kanakanji::application::comparison::{ComparisonHarness, RULE};
use kanakanji::error::{ConverterError, Result, print_fatal};
use kanakanji::infrastructure::config::ComparisonConfig;
use kanakanji::infrastructure::console::ConsoleOperator;
use kanakanji::infrastructure::external::oneshot_invocation::OneShotInvocation;
use kanakanji::infrastructure::external::statistics::StatisticsRunner;
use kanakanji::infrastructure::locator::{AutomationScript, locate_interpreter};
use kanakanji::utils::{config::EnvConfig, env::load_env, logging::init_tracing};
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    load_env();
    EnvConfig::init();
    init_tracing(false);

    tokio::select! {
        result = run() => match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                print_fatal(&e);
                ExitCode::from(1)
            }
        },
        _ = tokio::signal::ctrl_c() => {
            println!("\n\n中断されました");
            // 標準入力の読み取りは取り消せないため、ランタイムの終了を待たずに抜ける
            std::process::exit(0)
        }
    }
}

async fn run() -> Result<()> {
    let env = EnvConfig::get();
    let config = ComparisonConfig::load();

    let interpreter = locate_interpreter(env.ahk_path.as_deref())?;
    let script = AutomationScript::resolve(&config.script, &config.companion)?;
    let cwd = std::env::current_dir()
        .map_err(|e| ConverterError::Config(format!("working directory: {}", e)))?;

    let backend = OneShotInvocation::new(interpreter, script.script());

    println!("{}", RULE);
    println!("IME比較テストプログラム");
    println!("{}", RULE);
    println!("AutoHotkey: {}", backend.interpreter().display());
    println!("作業ディレクトリ: {}", cwd.display());
    println!();

    let mut harness = ComparisonHarness::new(backend, ConsoleOperator::new());

    let words = config.words();
    let rows = harness.run(&config.imes, &words).await?;

    let statistics = StatisticsRunner::new(&config.statistics_script);
    harness
        .finalize(&config.imes, &rows, &cwd, &statistics)
        .await?;
    Ok(())
}
