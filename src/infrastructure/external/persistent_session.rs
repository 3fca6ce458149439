//! 常駐型の AutoHotkey セッション
//!
//! 子プロセスを 1 度だけ起動し、標準入力へ 1 行ずつフレーズを送り、
//! 標準出力から 1 行ずつ結果を受け取る。`INFO:` などの診断行は結果として扱わない。

use crate::domain::backend::{ConversionBackend, is_diagnostic};
use crate::error::{ConverterError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStderr, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;

/// 入力を閉じてから終了を待つ時間
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// 1 フレーズの応答を待つ時間
pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(60);

/// セッション起動オプション
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// 変換キー送出後の待機時間（ミリ秒）。スクリプトへ追加引数として渡す
    pub settle_ms: Option<u64>,
    pub response_timeout: Duration,
    pub shutdown_timeout: Duration,
    /// 診断行を標準エラーへ表示する
    pub echo_diagnostics: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            settle_ms: None,
            response_timeout: DEFAULT_RESPONSE_TIMEOUT,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
            echo_diagnostics: false,
        }
    }
}

struct SessionIo {
    child: Child,
    /// close 後は None
    stdin: Option<ChildStdin>,
    stdout: Lines<BufReader<ChildStdout>>,
}

/// 常駐 AutoHotkey プロセスとの行単位セッション
pub struct PersistentSession {
    program: PathBuf,
    options: SessionOptions,
    io: Mutex<SessionIo>,
}

impl PersistentSession {
    /// `<interpreter> <script> [settle_ms]` を起動する
    ///
    /// tokio ランタイム内から呼び出すこと。
    pub fn spawn(interpreter: &Path, script: &Path, options: SessionOptions) -> Result<Self> {
        let mut cmd = Command::new(interpreter);
        cmd.arg(script);
        if let Some(ms) = options.settle_ms {
            cmd.arg(ms.to_string());
        }
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|source| ConverterError::SpawnFailed {
            program: interpreter.to_path_buf(),
            source,
        })?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            let _ = child.start_kill();
            return Err(ConverterError::ChildClosed);
        };
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(drain_stderr(stderr));
        }

        tracing::debug!(
            "Spawned persistent session: {} {} (settle={:?})",
            interpreter.display(),
            script.display(),
            options.settle_ms
        );

        Ok(Self {
            program: interpreter.to_path_buf(),
            options,
            io: Mutex::new(SessionIo {
                child,
                stdin: Some(stdin),
                stdout: BufReader::new(stdout).lines(),
            }),
        })
    }

    /// 入力を閉じ、子プロセスの終了を待つ。時間内に終わらなければ強制終了する
    pub async fn close(self) -> Result<()> {
        let mut io = self.io.into_inner();
        drop(io.stdin.take());

        let limit = self.options.shutdown_timeout;
        match tokio::time::timeout(limit, io.child.wait()).await {
            Ok(status) => {
                let status = status?;
                if !status.success() {
                    tracing::warn!("{} exited with {}", self.program.display(), status);
                }
                Ok(())
            }
            Err(_) => {
                let _ = io.child.kill().await;
                Err(ConverterError::ChildTimeout(limit))
            }
        }
    }

    /// ベストエフォートで子プロセスを強制終了する
    pub async fn terminate(&self) {
        let mut io = self.io.lock().await;
        if let Err(e) = io.child.kill().await {
            tracing::debug!("Failed to kill automation process: {}", e);
        }
    }
}

#[async_trait]
impl ConversionBackend for PersistentSession {
    async fn convert(&self, phrase: &str) -> Result<String> {
        let mut io = self.io.lock().await;

        let stdin = io.stdin.as_mut().ok_or(ConverterError::ChildClosed)?;
        stdin.write_all(phrase.as_bytes()).await?;
        stdin.write_all(b"\n").await?;
        stdin.flush().await?;

        let limit = self.options.response_timeout;
        let echo = self.options.echo_diagnostics;
        match tokio::time::timeout(limit, read_result(&mut io.stdout, echo)).await {
            Ok(result) => result,
            Err(_) => Err(ConverterError::ChildTimeout(limit)),
        }
    }
}

/// 診断行を読み飛ばし、最初の結果行を返す
async fn read_result(lines: &mut Lines<BufReader<ChildStdout>>, echo: bool) -> Result<String> {
    while let Some(line) = lines.next_line().await? {
        let line = line.trim_end_matches('\r');
        if is_diagnostic(line) {
            if echo {
                eprintln!("{}", line);
            }
            tracing::debug!("child: {}", line);
            continue;
        }
        return Ok(line.trim().to_string());
    }
    Err(ConverterError::ChildClosed)
}

async fn drain_stderr(stderr: ChildStderr) {
    let mut lines = BufReader::new(stderr).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        tracing::debug!("child stderr: {}", line);
    }
}
