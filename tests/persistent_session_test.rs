#![cfg(unix)]

mod common;

use common::{BATCH_STUB, resolve, shell, write_script};
use kanakanji::application::batch::{BatchJob, run_batch};
use kanakanji::domain::backend::ConversionBackend;
use kanakanji::error::ConverterError;
use kanakanji::infrastructure::external::persistent_session::{PersistentSession, SessionOptions};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

fn fast_options() -> SessionOptions {
    SessionOptions {
        response_timeout: Duration::from_secs(5),
        shutdown_timeout: Duration::from_secs(5),
        ..SessionOptions::default()
    }
}

/// 診断行は読み飛ばされ、結果だけが順番に返る
#[tokio::test]
async fn session_skips_diagnostic_lines() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    let script = write_script(tmp.path(), "kanakanji.ahk", BATCH_STUB);

    let session = PersistentSession::spawn(&shell(), &script, fast_options())?;
    assert_eq!(session.convert("いがくようご").await?, "医学用語");
    assert_eq!(session.convert("けんさけっか").await?, "けんさけっか");
    session.close().await?;
    Ok(())
}

/// 仕様例: 2 行入力で 1/2 が変換され、出力は同じ順序の 2 行
#[tokio::test]
async fn batch_writes_results_in_input_order() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    let script = write_script(tmp.path(), "kanakanji.ahk", BATCH_STUB);
    let input = tmp.path().join("input.txt");
    let output = tmp.path().join("output.txt");
    fs::write(&input, "いがくようご\n\n   \nけんさけっか\n")?;

    let job = BatchJob {
        input,
        output: output.clone(),
    };
    let summary = run_batch(&shell(), &resolve(&script), &job, fast_options()).await?;

    assert_eq!(summary.total, 2);
    assert_eq!(summary.changed, 1);
    let written = fs::read_to_string(&output)?;
    assert_eq!(written, "医学用語\nけんさけっか\n");
    assert!(!written.contains("INFO:"));
    assert!(!written.contains("DEBUG:"));
    Ok(())
}

/// 待機時間は追加引数としてスクリプトへ渡る
#[tokio::test]
async fn settle_time_is_forwarded_as_argument() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    let script = write_script(
        tmp.path(),
        "settle.ahk",
        "while IFS= read -r line; do echo \"$line:$1\"; done\n",
    );

    let options = SessionOptions {
        settle_ms: Some(450),
        ..fast_options()
    };
    let session = PersistentSession::spawn(&shell(), &script, options)?;
    assert_eq!(session.convert("しんだん").await?, "しんだん:450");
    session.close().await?;
    Ok(())
}

/// 応答前に子プロセスが終了したらバッチ全体が失敗し、出力は作られない
#[tokio::test]
async fn child_exit_mid_batch_is_fatal() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    let script = write_script(
        tmp.path(),
        "crash.ahk",
        "IFS= read -r line; echo \"$line\"; exit 3\n",
    );
    let input = tmp.path().join("input.txt");
    let output = tmp.path().join("output.txt");
    fs::write(&input, "しんだん\nちりょう\nかんじゃ\n")?;

    let job = BatchJob {
        input,
        output: output.clone(),
    };
    let err = run_batch(&shell(), &resolve(&script), &job, fast_options())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ConverterError::ChildClosed | ConverterError::ChildIo(_)
    ));
    assert!(!output.exists());
    Ok(())
}

/// 入力を閉じても終了しない子プロセスは強制終了され、タイムアウトになる
#[tokio::test]
async fn shutdown_timeout_kills_child() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    let script = write_script(
        tmp.path(),
        "stubborn.ahk",
        "IFS= read -r line; echo \"$line\"; exec sleep 30\n",
    );

    let options = SessionOptions {
        shutdown_timeout: Duration::from_millis(300),
        ..fast_options()
    };
    let session = PersistentSession::spawn(&shell(), &script, options)?;
    assert_eq!(session.convert("けんさ").await?, "けんさ");

    let err = session.close().await.unwrap_err();
    assert!(matches!(err, ConverterError::ChildTimeout(_)));
    Ok(())
}

/// 応答が返らない場合は応答タイムアウトになる
#[tokio::test]
async fn silent_child_hits_response_timeout() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    let script = write_script(tmp.path(), "silent.ahk", "exec sleep 30\n");

    let options = SessionOptions {
        response_timeout: Duration::from_millis(300),
        ..fast_options()
    };
    let session = PersistentSession::spawn(&shell(), &script, options)?;
    let err = session.convert("びょういん").await.unwrap_err();
    assert!(matches!(err, ConverterError::ChildTimeout(_)));
    session.terminate().await;
    Ok(())
}

/// 起動できない場合は専用のエラー種別になる
#[tokio::test]
async fn spawn_failure_is_distinct() {
    let tmp = TempDir::new().unwrap();
    let script = write_script(tmp.path(), "kanakanji.ahk", BATCH_STUB);
    let missing = tmp.path().join("AutoHotkey.exe");

    let err = PersistentSession::spawn(&missing, &script, fast_options())
        .err()
        .expect("spawn must fail");
    assert!(matches!(err, ConverterError::SpawnFailed { .. }));
}
