//! バッチ変換サービス
//!
//! 入力ファイルのフレーズを常駐セッションへ順番に流し、全件そろってから出力ファイルへ書き出す。
//! 途中の失敗は再試行せず、セッションを強制終了して致命的エラーとする。

use crate::domain::backend::ConversionBackend;
use crate::domain::conversion::{
    ConversionRequest, ConversionResult, changed_count, parse_requests,
};
use crate::error::{ConverterError, Result};
use crate::infrastructure::external::persistent_session::{PersistentSession, SessionOptions};
use crate::infrastructure::locator::AutomationScript;
use std::io::Write;
use std::path::{Path, PathBuf};

/// 進捗表示で見せるフレーズの最大文字数
const PROGRESS_PREVIEW_CHARS: usize = 30;

/// 1 回のバッチ変換
#[derive(Debug, Clone)]
pub struct BatchJob {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// 変換結果の集計
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub changed: usize,
}

/// 入力ファイルを読み、空行を除いたリクエスト列を返す
pub fn read_requests(path: &Path) -> Result<Vec<ConversionRequest>> {
    let text = std::fs::read_to_string(path).map_err(|source| ConverterError::MissingInput {
        path: path.to_path_buf(),
        source,
    })?;
    let requests = parse_requests(&text);
    if requests.is_empty() {
        return Err(ConverterError::EmptyInput(path.to_path_buf()));
    }
    Ok(requests)
}

/// 全リクエストを順番に変換する。1 件でも失敗したら即座にエラーを返す
pub async fn convert_all<B>(backend: &B, requests: &[ConversionRequest]) -> Result<Vec<ConversionResult>>
where
    B: ConversionBackend + ?Sized,
{
    let total = requests.len();
    let mut results = Vec::with_capacity(total);
    for (i, request) in requests.iter().enumerate() {
        let preview: String = request.phrase().chars().take(PROGRESS_PREVIEW_CHARS).collect();
        print!("Converting line {}/{}: {}...\r", i + 1, total, preview);
        let _ = std::io::stdout().flush();

        let output = backend.convert(request.phrase()).await?;
        tracing::debug!("{} -> {}", request, output);
        results.push(ConversionResult::new(request, output));
    }
    Ok(results)
}

/// 結果を 1 行 1 件で書き出す
pub fn write_results(path: &Path, results: &[ConversionResult]) -> Result<()> {
    let mut body = String::new();
    for result in results {
        body.push_str(result.output());
        body.push('\n');
    }
    std::fs::write(path, body).map_err(|source| ConverterError::OutputWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// 常駐セッションでバッチ変換を実行する
pub async fn run_batch(
    interpreter: &Path,
    script: &AutomationScript,
    job: &BatchJob,
    options: SessionOptions,
) -> Result<BatchSummary> {
    let requests = read_requests(&job.input)?;
    println!("Processing {} lines...", requests.len());

    let session = PersistentSession::spawn(interpreter, script.script(), options)?;
    let results = match convert_all(&session, &requests).await {
        Ok(results) => results,
        Err(e) => {
            println!();
            session.terminate().await;
            return Err(e);
        }
    };
    session.close().await?;
    println!("\nConversion completed.");

    write_results(&job.output, &results)?;
    println!("Results saved to: {}", job.output.display());

    Ok(BatchSummary {
        total: results.len(),
        changed: changed_count(&results),
    })
}
