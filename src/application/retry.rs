//! 固定待機付きの再試行コンビネータ

use std::future::Future;
use std::time::Duration;

/// 既定の試行回数
pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;

/// 既定の再試行間隔
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// 再試行ポリシー（試行回数・待機時間）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 初回を含む試行回数の上限
    pub max_attempts: u32,
    /// 失敗後、次の試行までの待機時間
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// `op` を成功するまで最大 `max_attempts` 回実行する
    ///
    /// `should_retry` が false を返したエラーは即座に返す。
    /// 全試行が失敗した場合は最後のエラーを返す。
    pub async fn run<T, E, F, Fut, P>(&self, mut op: F, should_retry: P) -> Result<T, E>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
        E: std::fmt::Display,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < max_attempts && should_retry(&e) => {
                    tracing::warn!(
                        "Attempt {}/{} failed: {}; retrying in {:?}",
                        attempt,
                        max_attempts,
                        e,
                        self.delay
                    );
                    tokio::time::sleep(self.delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
