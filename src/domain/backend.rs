//! 変換バックエンドのインターフェース定義
//!
//! 自動化インタプリタを 1 フレーズ単位の変換器として扱うための抽象。
//! 常駐セッション (`PersistentSession`) と 1 回起動 (`OneShotInvocation`) が実装する。

use crate::error::Result;
use async_trait::async_trait;

/// 子プロセスの出力で、結果ではない診断行の接頭辞
pub const DIAGNOSTIC_PREFIXES: &[&str] = &["INFO:", "DEBUG:"];

/// 自動化スクリプトが失敗を通知する接頭辞
pub const ERROR_PREFIX: &str = "ERROR:";

/// 診断行かどうか
pub fn is_diagnostic(line: &str) -> bool {
    DIAGNOSTIC_PREFIXES
        .iter()
        .any(|prefix| line.starts_with(prefix))
}

/// エラー通知行かどうか
pub fn is_error_line(line: &str) -> bool {
    line.starts_with(ERROR_PREFIX)
}

/// ひらがな → 変換結果 の変換器
#[async_trait]
pub trait ConversionBackend: Send + Sync {
    /// 1 フレーズを変換し、結果テキストを返す
    async fn convert(&self, phrase: &str) -> Result<String>;
}
