#![cfg(unix)]

mod common;

use common::{shell, write_script};
use kanakanji::application::retry::RetryPolicy;
use kanakanji::domain::backend::ConversionBackend;
use kanakanji::error::ConverterError;
use kanakanji::infrastructure::external::oneshot_invocation::OneShotInvocation;
use std::cell::Cell;
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// 引数で受け取ったフレーズを変換して 1 行返す
#[tokio::test]
async fn phrase_is_passed_as_argument() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    let script = write_script(
        tmp.path(),
        "ime_test_universal.ahk",
        "case \"$1\" in しんだん) echo \"  診断  \" ;; *) echo \"$1\" ;; esac\n",
    );

    let invocation = OneShotInvocation::new(shell(), &script);
    assert_eq!(invocation.convert("しんだん").await?, "診断");
    assert_eq!(invocation.convert("けんさ").await?, "けんさ");
    Ok(())
}

/// 不正な UTF-8 は捨てられ、エラーにならない
#[tokio::test]
async fn invalid_utf8_is_dropped() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    let script = write_script(tmp.path(), "bytes.ahk", "printf '\\377\\346\\244\\234\\346\\237\\273\\n'\n");

    let invocation = OneShotInvocation::new(shell(), &script);
    assert_eq!(invocation.convert("けんさ").await?, "検査");
    Ok(())
}

/// `ERROR:` で始まる結果は失敗扱い
#[tokio::test]
async fn error_prefix_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let script = write_script(
        tmp.path(),
        "error.ahk",
        "echo 'ERROR: editor window not found'\n",
    );

    let invocation = OneShotInvocation::new(shell(), &script);
    let err = invocation.convert("かんじゃ").await.unwrap_err();
    assert!(matches!(err, ConverterError::ConversionRejected(msg) if msg.contains("editor window")));
}

/// 時間内に終わらなければ強制終了してタイムアウト
#[tokio::test]
async fn hung_process_times_out() {
    let tmp = TempDir::new().unwrap();
    let script = write_script(tmp.path(), "hang.ahk", "exec sleep 30\n");

    let invocation =
        OneShotInvocation::new(shell(), &script).with_timeout(Duration::from_millis(300));
    let started = Instant::now();
    let err = invocation.convert("びょういん").await.unwrap_err();

    assert!(matches!(err, ConverterError::ChildTimeout(_)));
    assert!(started.elapsed() < Duration::from_secs(10));
}

/// 1 回目がエラー・2 回目が成功なら 2 回目の結果を返し、再試行は 1 回だけ
#[tokio::test]
async fn error_then_success_retries_once() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    let marker = tmp.path().join("attempted");
    let body = format!(
        "if [ -f '{m}' ]; then echo '医学用語'; else : > '{m}'; echo 'ERROR: not ready'; fi\n",
        m = marker.display()
    );
    let script = write_script(tmp.path(), "flaky.ahk", &body);

    let invocation = OneShotInvocation::new(shell(), &script);
    let attempts = Cell::new(0);
    let result = RetryPolicy::new(2, Duration::from_millis(10))
        .run(
            |_| {
                attempts.set(attempts.get() + 1);
                invocation.convert("いがくようご")
            },
            ConverterError::is_retryable,
        )
        .await?;

    assert_eq!(result, "医学用語");
    assert_eq!(attempts.get(), 2);
    Ok(())
}

/// 毎回タイムアウトする場合は上限回数だけ試して諦める
#[tokio::test]
async fn repeated_timeouts_exhaust_attempts() {
    let tmp = TempDir::new().unwrap();
    let script = write_script(tmp.path(), "hang.ahk", "exec sleep 30\n");

    let invocation =
        OneShotInvocation::new(shell(), &script).with_timeout(Duration::from_millis(200));
    let attempts = Cell::new(0);
    let delay = Duration::from_millis(50);
    let started = Instant::now();
    let result = RetryPolicy::new(2, delay)
        .run(
            |_| {
                attempts.set(attempts.get() + 1);
                invocation.convert("しょうじょう")
            },
            ConverterError::is_retryable,
        )
        .await;

    assert!(matches!(result, Err(ConverterError::ChildTimeout(_))));
    assert_eq!(attempts.get(), 2);
    // 試行の間に 1 回待機している
    assert!(started.elapsed() >= Duration::from_millis(400) + delay);
}
