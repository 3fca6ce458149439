//! 比較結果の CSV 出力と集計

use crate::domain::conversion::{ComparisonRow, ImeLabel};
use crate::error::{ConverterError, Result};
use chrono::{DateTime, Local};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Excel で文字化けしないよう先頭に付ける BOM
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

const CSV_HEADER: [&str; 4] = ["ime", "input", "output", "converted"];

/// `ime_comparison_<YYYYMMDD_HHMMSS>.csv`
pub fn report_file_name(at: DateTime<Local>) -> String {
    format!("ime_comparison_{}.csv", at.format("%Y%m%d_%H%M%S"))
}

/// BOM 付き UTF-8 で全行を書き出す（ヘッダ: ime,input,output,converted）
pub fn write_csv(path: &Path, rows: &[ComparisonRow]) -> Result<()> {
    let to_err = |source| ConverterError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };
    let mut file = File::create(path).map_err(to_err)?;
    file.write_all(UTF8_BOM).map_err(to_err)?;

    // 行が 0 件でもヘッダは出力する
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    writer.write_record(CSV_HEADER)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().map_err(to_err)?;
    Ok(())
}

/// カレントディレクトリにタイムスタンプ付きで書き出し、パスを返す
pub fn write_timestamped_csv(dir: &Path, rows: &[ComparisonRow]) -> Result<PathBuf> {
    let path = dir.join(report_file_name(Local::now()));
    write_csv(&path, rows)?;
    Ok(path)
}

/// IME ごとの成功数
#[derive(Debug, Clone, PartialEq)]
pub struct ImeSummary {
    pub ime: ImeLabel,
    pub success: usize,
    pub total: usize,
}

impl ImeSummary {
    /// 成功率（%）。対象 0 件なら 0
    pub fn rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.success as f64 / self.total as f64 * 100.0
        }
    }
}

/// IME の並び順を保ったまま集計する
pub fn summarize(imes: &[ImeLabel], rows: &[ComparisonRow]) -> Vec<ImeSummary> {
    imes.iter()
        .map(|ime| {
            let mine = rows.iter().filter(|r| r.ime == ime.as_str());
            let (success, total) = mine.fold((0, 0), |(s, t), r| {
                (s + usize::from(r.outcome().is_success()), t + 1)
            });
            ImeSummary {
                ime: ime.clone(),
                success,
                total,
            }
        })
        .collect()
}

/// 最終サマリーの 1 行
pub fn format_summary_line(summary: &ImeSummary) -> String {
    format!(
        "  {:25}: {:2}/{:2} ({:5.1}%)",
        summary.ime.as_str(),
        summary.success,
        summary.total,
        summary.rate()
    )
}
