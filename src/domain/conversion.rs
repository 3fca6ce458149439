//! 変換リクエスト・結果エンティティ – ドメイン層

use serde::{Deserialize, Serialize};
use std::fmt;

/// 変換対象の 1 フレーズ（trim 済み・非空・1 行）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest(String);

impl ConversionRequest {
    /// 1 行から生成する。空行・空白のみの行は `None`
    pub fn from_line(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn phrase(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 入力テキストを改行で分割し、空行を捨ててリクエスト列にする
pub fn parse_requests(text: &str) -> Vec<ConversionRequest> {
    text.lines().filter_map(ConversionRequest::from_line).collect()
}

/// 1 フレーズ分の変換結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionResult {
    input: String,
    output: String,
    changed: bool,
}

impl ConversionResult {
    pub fn new(request: &ConversionRequest, output: impl Into<String>) -> Self {
        let output = output.into();
        let changed = output != request.phrase();
        Self {
            input: request.phrase().to_string(),
            output,
            changed,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    /// 出力が入力と異なるか
    pub fn changed(&self) -> bool {
        self.changed
    }
}

/// 変更件数 / 総数
pub fn changed_count(results: &[ConversionResult]) -> usize {
    results.iter().filter(|r| r.changed()).count()
}

/// オペレーターが選んだ IME のラベル。プログラムの挙動には影響しない
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImeLabel(String);

impl ImeLabel {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 比較テスト 1 件の判定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// 入力と異なる文字列が返った
    Converted,
    /// 入力がそのまま返った
    Unchanged,
    /// 結果を取得できなかった
    Failed,
}

/// 取得失敗時に output 列へ書く値
pub const FAILED_OUTPUT_MARKER: &str = "(エラー)";

impl Outcome {
    /// 1 回の変換結果を判定する。空文字列は取得失敗として扱う
    pub fn classify(input: &str, output: Option<&str>) -> Self {
        match output {
            Some(out) if out.is_empty() => Outcome::Failed,
            Some(out) if out != input => Outcome::Converted,
            Some(_) => Outcome::Unchanged,
            None => Outcome::Failed,
        }
    }

    /// CSV の converted 列ラベル
    pub fn label(self) -> &'static str {
        match self {
            Outcome::Converted => "成功",
            Outcome::Unchanged => "失敗",
            Outcome::Failed => "エラー",
        }
    }

    pub fn is_success(self) -> bool {
        self == Outcome::Converted
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 比較 CSV の 1 行（列順: ime, input, output, converted）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub ime: String,
    pub input: String,
    pub output: String,
    pub converted: String,
}

impl ComparisonRow {
    pub fn new(ime: &ImeLabel, input: &str, output: Option<&str>) -> Self {
        let outcome = Outcome::classify(input, output);
        let output = match (outcome, output) {
            (Outcome::Failed, _) | (_, None) => FAILED_OUTPUT_MARKER.to_string(),
            (_, Some(out)) => out.to_string(),
        };
        Self {
            ime: ime.as_str().to_string(),
            input: input.to_string(),
            output,
            converted: outcome.label().to_string(),
        }
    }

    pub fn outcome(&self) -> Outcome {
        match self.converted.as_str() {
            "成功" => Outcome::Converted,
            "失敗" => Outcome::Unchanged,
            _ => Outcome::Failed,
        }
    }
}
