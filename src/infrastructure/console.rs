//! 標準入力でオペレーターと対話する `Operator` 実装

use crate::application::traits::Operator;
use crate::domain::conversion::ImeLabel;
use crate::error::{ConverterError, Result};
use async_trait::async_trait;
use std::io::{self, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

/// 入力行から Enter / y を受け取るオペレーター（既定は標準入力）
pub struct ConsoleOperator<R = BufReader<Stdin>> {
    lines: Lines<R>,
}

impl Default for ConsoleOperator {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleOperator {
    pub fn new() -> Self {
        Self::from_reader(BufReader::new(tokio::io::stdin()))
    }
}

impl<R> ConsoleOperator<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn from_reader(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }

    /// 1 行読む。入力が閉じていれば `None`
    async fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        print!("{}", message);
        io::stdout().flush().map_err(ConverterError::Console)?;
        self.lines.next_line().await.map_err(ConverterError::Console)
    }
}

#[async_trait]
impl<R> Operator for ConsoleOperator<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn await_ready(&mut self, ime: &ImeLabel) -> Result<()> {
        println!("準備:");
        println!("  1. タスクバーの言語アイコンから「{}」に切り替えてください", ime);
        println!("  2. IMEが「{}」になっていることを確認してください", ime);
        println!("  3. 他のアプリケーションをすべて閉じてください");
        println!();
        println!("⚠ 注意: テスト中はキーボード・マウスを操作しないでください");
        println!();
        // 確認が取れないまま IME のテストを始めてはいけない
        match self.prompt("準備ができたらEnterキーを押してください...").await? {
            Some(_) => Ok(()),
            None => Err(ConverterError::Console(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "standard input closed before the operator confirmed",
            ))),
        }
    }

    async fn confirm_statistics(&mut self) -> Result<bool> {
        println!("統計解析を実行しますか？");
        let answer = self
            .prompt("R統計解析を実行する場合は 'y' を入力: ")
            .await?;
        // EOF は「実行しない」
        Ok(answer.as_deref().is_some_and(is_yes))
    }
}

fn is_yes(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}
