//! 外部の R スクリプトで比較結果を統計解析する

use std::path::{Path, PathBuf};
use tokio::process::Command;

/// `Rscript <script> <csv>` を実行するランナー
#[derive(Debug, Clone)]
pub struct StatisticsRunner {
    program: PathBuf,
    script: PathBuf,
}

impl StatisticsRunner {
    pub fn new(script: impl Into<PathBuf>) -> Self {
        Self {
            program: PathBuf::from("Rscript"),
            script: script.into(),
        }
    }

    /// `Rscript` 以外の実行ファイルを使う
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// 解析スクリプトが存在するか
    pub fn is_available(&self) -> bool {
        self.script.is_file()
    }

    /// 解析を実行する。失敗は報告のみで比較結果には影響しない
    pub async fn run(&self, csv: &Path) -> bool {
        println!("\nR統計解析を実行中...");
        match Command::new(&self.program)
            .arg(&self.script)
            .arg(csv)
            .status()
            .await
        {
            Ok(status) if status.success() => true,
            Ok(status) => {
                eprintln!("R実行エラー: {}", status);
                false
            }
            Err(e) => {
                eprintln!("R実行エラー: {}", e);
                false
            }
        }
    }
}
