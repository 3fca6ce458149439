use crate::domain::conversion::ImeLabel;
use crate::error::{ConverterError, Result};
use crate::infrastructure::locator::DEFAULT_COMPANION;
use crate::utils::config::EnvConfig;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

/// 比較テスト用の自動化スクリプト
pub const DEFAULT_COMPARISON_SCRIPT: &str = "ime_test_universal.ahk";

/// 比較結果を解析する R スクリプト
pub const DEFAULT_STATISTICS_SCRIPT: &str = "analyze_ime_results.R";

const DEFAULT_WORDS: &[&str] = &[
    "いがくようご",
    "けんさけっか",
    "しんだん",
    "ちりょう",
    "かんじゃ",
    "しょうじょう",
    "けんさ",
    "びょういん",
];

const DEFAULT_IMES: &[&str] = &["Microsoft IME", "Mozc", "Google日本語入力"];

/// 比較テストの設定。`comparison.json` があれば上書きされる
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    pub imes: Vec<ImeLabel>,
    pub words: Vec<String>,
    pub script: PathBuf,
    pub companion: String,
    pub statistics_script: PathBuf,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            imes: DEFAULT_IMES.iter().map(|name| ImeLabel::new(*name)).collect(),
            words: DEFAULT_WORDS.iter().map(|w| w.to_string()).collect(),
            script: PathBuf::from(DEFAULT_COMPARISON_SCRIPT),
            companion: DEFAULT_COMPANION.to_string(),
            statistics_script: PathBuf::from(DEFAULT_STATISTICS_SCRIPT),
        }
    }
}

fn data_dir() -> Option<PathBuf> {
    let config = EnvConfig::get();
    if let Some(xdg_data_home) = &config.xdg_data_home {
        return Some(PathBuf::from(xdg_data_home).join("kanakanji"));
    }

    ProjectDirs::from("com", "user", "kanakanji").map(|proj| proj.data_local_dir().to_path_buf())
}

/// 設定ファイルの場所
pub fn config_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("comparison.json"))
}

impl ComparisonConfig {
    /// 設定ファイルを読み込む。存在しない・壊れている場合は既定値
    pub fn load() -> Self {
        let Some(path) = config_path() else {
            return Self::default();
        };
        match Self::load_from(&path) {
            Ok(cfg) => cfg,
            Err(e) => {
                if path.exists() {
                    tracing::warn!("Ignoring {}: {}", path.display(), e);
                }
                Self::default()
            }
        }
    }

    /// 指定パスから読み込み、内容を検証する
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let f = fs::File::open(path)
            .map_err(|e| ConverterError::Config(format!("{}: {}", path.display(), e)))?;
        let cfg: Self = serde_json::from_reader(f)
            .map_err(|e| ConverterError::Config(format!("{}: {}", path.display(), e)))?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        if self.imes.is_empty() {
            return Err(ConverterError::Config("imes must not be empty".into()));
        }
        if self.words.iter().all(|w| w.trim().is_empty()) {
            return Err(ConverterError::Config("words must not be empty".into()));
        }
        Ok(())
    }

    /// 空白を除いた単語一覧
    pub fn words(&self) -> Vec<String> {
        self.words
            .iter()
            .map(|w| w.trim())
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect()
    }
}
