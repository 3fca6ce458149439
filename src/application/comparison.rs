//! IME 比較テストのオーケストレーション
//!
//! IME ごとに `AwaitOperatorReady → Countdown → Running → Summarized` の順で進める。
//! 対象 IME は OS 側の状態なので、オペレーターが切り替えたことを確認してから変換を始める。
//! 単語ごとに 1 回起動の変換器を再試行付きで呼び、結果に関わらず必ず 1 行を記録する。

use crate::application::retry::RetryPolicy;
use crate::application::traits::Operator;
use crate::domain::backend::ConversionBackend;
use crate::domain::conversion::{ComparisonRow, ImeLabel, Outcome};
use crate::error::{ConverterError, Result};
use crate::infrastructure::external::statistics::StatisticsRunner;
use crate::infrastructure::report::{
    ImeSummary, format_summary_line, summarize, write_timestamped_csv,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 見出しの区切り線
pub const RULE: &str = "======================================================================";

/// 外部 IME / 自動化が落ち着くまでの待機時間
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// 各単語の後（成否に関わらず）
    pub per_word: Duration,
    /// 次の IME に移る前
    pub between_imes: Duration,
    /// 開始前カウントダウンの秒数
    pub countdown_steps: u32,
    pub countdown_tick: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            per_word: Duration::from_millis(1500),
            between_imes: Duration::from_secs(2),
            countdown_steps: 5,
            countdown_tick: Duration::from_secs(1),
        }
    }
}

/// IME 1 つ分の進行状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImeStage {
    AwaitOperatorReady,
    Countdown(u32),
    Running,
    Summarized,
}

/// 比較テストの実行器
pub struct ComparisonHarness<B, O> {
    backend: B,
    operator: O,
    retry: RetryPolicy,
    pacing: Pacing,
}

impl<B, O> ComparisonHarness<B, O>
where
    B: ConversionBackend,
    O: Operator,
{
    pub fn new(backend: B, operator: O) -> Self {
        Self {
            backend,
            operator,
            retry: RetryPolicy::default(),
            pacing: Pacing::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn operator(&self) -> &O {
        &self.operator
    }

    /// 全 IME × 全単語を実行し、記録した行を返す
    pub async fn run(&mut self, imes: &[ImeLabel], words: &[String]) -> Result<Vec<ComparisonRow>> {
        println!("テスト対象:");
        for (i, ime) in imes.iter().enumerate() {
            println!("  {}. {}", i + 1, ime);
        }
        println!("\nテスト単語数: {}", words.len());
        println!(
            "総テスト数: {} × {} = {}",
            imes.len(),
            words.len(),
            imes.len() * words.len()
        );
        println!();

        let mut rows = Vec::with_capacity(imes.len() * words.len());
        for (index, ime) in imes.iter().enumerate() {
            println!("{}", RULE);
            println!("【{}/{}】 {} のテスト", index + 1, imes.len(), ime);
            println!("{}", RULE);
            println!();

            self.run_ime(ime, words, &mut rows).await?;

            if index + 1 < imes.len() {
                tokio::time::sleep(self.pacing.between_imes).await;
            }
        }
        Ok(rows)
    }

    async fn run_ime(
        &mut self,
        ime: &ImeLabel,
        words: &[String],
        rows: &mut Vec<ComparisonRow>,
    ) -> Result<ImeSummary> {
        let mut stage = ImeStage::AwaitOperatorReady;
        let mut success = 0;
        loop {
            stage = match stage {
                ImeStage::AwaitOperatorReady => {
                    self.operator.await_ready(ime).await?;
                    println!(
                        "\n{}秒後にテスト開始します...",
                        self.pacing.countdown_steps
                    );
                    ImeStage::Countdown(self.pacing.countdown_steps)
                }
                ImeStage::Countdown(0) => {
                    println!(" 開始！\n");
                    ImeStage::Running
                }
                ImeStage::Countdown(remaining) => {
                    print!("  {}...", remaining);
                    let _ = std::io::stdout().flush();
                    tokio::time::sleep(self.pacing.countdown_tick).await;
                    ImeStage::Countdown(remaining - 1)
                }
                ImeStage::Running => {
                    for (i, word) in words.iter().enumerate() {
                        print!("  [{}/{}] 入力: {} ", i + 1, words.len(), word);
                        let _ = std::io::stdout().flush();

                        let output = self.convert_word(word).await;
                        let row = ComparisonRow::new(ime, word, output.as_deref());
                        match row.outcome() {
                            Outcome::Failed => println!("→ (取得失敗) ×"),
                            outcome => {
                                let mark = if outcome.is_success() { "✓" } else { "×" };
                                println!("→ {} {}", row.output, mark);
                            }
                        }
                        if row.outcome().is_success() {
                            success += 1;
                        }
                        rows.push(row);

                        tokio::time::sleep(self.pacing.per_word).await;
                    }
                    ImeStage::Summarized
                }
                ImeStage::Summarized => {
                    let summary = ImeSummary {
                        ime: ime.clone(),
                        success,
                        total: words.len(),
                    };
                    println!();
                    println!(
                        "  {} 結果: {}/{} 成功 ({:.1}%)",
                        ime,
                        summary.success,
                        summary.total,
                        summary.rate()
                    );
                    println!();
                    return Ok(summary);
                }
            };
        }
    }

    /// 1 単語を再試行付きで変換する。全試行が失敗したら `None`
    pub async fn convert_word(&self, word: &str) -> Option<String> {
        let backend = &self.backend;
        let max_attempts = self.retry.max_attempts;
        let result = self
            .retry
            .run(
                |attempt| {
                    if attempt > 1 {
                        print!("\n    リトライ中... ({}/{}) ", attempt - 1, max_attempts);
                        let _ = std::io::stdout().flush();
                    }
                    backend.convert(word)
                },
                ConverterError::is_retryable,
            )
            .await;

        match result {
            Ok(output) => Some(output),
            Err(e) => {
                print!("\n    ⚠ {} ", e);
                None
            }
        }
    }

    /// CSV 出力・最終サマリー・統計解析（任意）
    pub async fn finalize(
        &mut self,
        imes: &[ImeLabel],
        rows: &[ComparisonRow],
        dir: &Path,
        statistics: &StatisticsRunner,
    ) -> Result<PathBuf> {
        let csv_path = write_timestamped_csv(dir, rows)?;

        println!("{}", RULE);
        println!("テスト完了！");
        println!("{}", RULE);
        println!();
        println!("結果サマリー:");
        for summary in summarize(imes, rows) {
            println!("{}", format_summary_line(&summary));
        }
        println!();
        println!("詳細結果: {}", csv_path.display());
        println!();

        if statistics.is_available() && self.operator.confirm_statistics().await? {
            statistics.run(&csv_path).await;
        }
        Ok(csv_path)
    }
}
