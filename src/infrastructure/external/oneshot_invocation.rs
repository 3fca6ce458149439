//! 1 フレーズごとに AutoHotkey を起動する変換器
//!
//! IME 比較では試行ごとにプロセスを分離するため、フレーズを引数として渡し、
//! 標準出力の 1 行を結果として受け取る。

use crate::domain::backend::{ConversionBackend, is_diagnostic, is_error_line};
use crate::error::{ConverterError, Result};
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, ChildStderr, ChildStdout, Command};

/// 1 回の起動を待つ時間
pub const DEFAULT_INVOCATION_TIMEOUT: Duration = Duration::from_secs(40);

/// `<interpreter> <script> <phrase>` を毎回起動する変換器
#[derive(Debug, Clone)]
pub struct OneShotInvocation {
    interpreter: PathBuf,
    script: PathBuf,
    timeout: Duration,
}

impl OneShotInvocation {
    pub fn new(interpreter: impl Into<PathBuf>, script: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
            script: script.into(),
            timeout: DEFAULT_INVOCATION_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn interpreter(&self) -> &Path {
        &self.interpreter
    }

    /// 1 回だけ起動して結果を取得する
    pub async fn invoke(&self, phrase: &str) -> Result<String> {
        let mut child = Command::new(&self.interpreter)
            .arg(&self.script)
            .arg(phrase)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ConverterError::SpawnFailed {
                program: self.interpreter.clone(),
                source,
            })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let collected =
            tokio::time::timeout(self.timeout, collect_output(&mut child, stdout, stderr)).await;

        let (out, err) = match collected {
            Ok(result) => result?,
            Err(_) => {
                let _ = child.kill().await;
                return Err(ConverterError::ChildTimeout(self.timeout));
            }
        };

        if !err.is_empty() {
            tracing::debug!("child stderr: {}", decode_permissive(&err).trim());
        }

        let result = result_line(&decode_permissive(&out));
        if is_error_line(&result) {
            return Err(ConverterError::ConversionRejected(result));
        }
        Ok(result)
    }
}

#[async_trait]
impl ConversionBackend for OneShotInvocation {
    async fn convert(&self, phrase: &str) -> Result<String> {
        self.invoke(phrase).await
    }
}

async fn collect_output(
    child: &mut Child,
    stdout: Option<ChildStdout>,
    stderr: Option<ChildStderr>,
) -> io::Result<(Vec<u8>, Vec<u8>)> {
    let read_out = async {
        let mut buf = Vec::new();
        if let Some(mut out) = stdout {
            out.read_to_end(&mut buf).await?;
        }
        Ok::<_, io::Error>(buf)
    };
    let read_err = async {
        let mut buf = Vec::new();
        if let Some(mut err) = stderr {
            err.read_to_end(&mut buf).await?;
        }
        Ok::<_, io::Error>(buf)
    };
    let (out, err) = tokio::try_join!(read_out, read_err)?;
    let status = child.wait().await?;
    if !status.success() {
        tracing::debug!("automation process exited with {}", status);
    }
    Ok((out, err))
}

/// 不正な UTF-8 バイトを捨ててデコードする
pub fn decode_permissive(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

/// 診断行を除いた最初の非空行（trim 済み）
fn result_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !is_diagnostic(line))
        .unwrap_or_default()
        .to_string()
}
