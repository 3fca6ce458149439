//! Application層の抽象化トレイト定義
//! オペレーターとの対話を抽象化し、テスト可能な構造を提供します

use crate::domain::conversion::ImeLabel;
use crate::error::Result;
use async_trait::async_trait;

/// 比較テストを操作する人間（IME の切替・開始確認）
#[async_trait]
pub trait Operator: Send {
    /// 指定 IME への切替が完了するまで待つ
    async fn await_ready(&mut self, ime: &ImeLabel) -> Result<()>;

    /// 統計解析を実行するか確認する
    async fn confirm_statistics(&mut self) -> Result<bool>;
}
