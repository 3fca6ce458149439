//! AutoHotkey 実行ファイルと自動化スクリプトの検出
//!
//! 既知のインストール先を順に調べ、見つからなければ PATH から探す。
//! どちらでも見つからない場合は呼び出し元コマンドにとって致命的なエラーとなる。

use crate::error::{ConverterError, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// 標準的なインストール先（優先順）
const WELL_KNOWN_PATHS: &[&str] = &[
    r"C:\Program Files\AutoHotkey\AutoHotkey.exe",
    r"C:\Program Files\AutoHotkey\AutoHotkeyU64.exe",
    r"C:\Program Files\AutoHotkey\AutoHotkeyU32.exe",
    r"C:\Program Files\AutoHotkey\v2\AutoHotkey64.exe",
    r"C:\Program Files (x86)\AutoHotkey\AutoHotkey.exe",
];

/// ユーザーディレクトリ配下のインストール先
const USER_INSTALL_SUFFIX: &str = r"AppData\Local\Programs\AutoHotkey\AutoHotkey.exe";

/// PATH 上で探す実行ファイル名
const PATH_EXECUTABLES: &[&str] = &["AutoHotkey.exe", "AutoHotkey64.exe", "AutoHotkey"];

/// 既定の候補パス一覧
pub fn default_candidates() -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> = WELL_KNOWN_PATHS.iter().map(PathBuf::from).collect();
    if let Some(home) = std::env::var_os("USERPROFILE") {
        candidates.push(PathBuf::from(home).join(USER_INSTALL_SUFFIX));
    }
    candidates
}

/// AutoHotkey の実行ファイルを探す
///
/// `override_path` が存在すればそれを最優先で返す。
pub fn locate_interpreter(override_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = override_path {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        tracing::warn!("Configured interpreter {} does not exist", path.display());
    }
    locate_in(&default_candidates(), std::env::var_os("PATH"))
}

/// 候補パスと PATH 値を明示して探す
pub fn locate_in(candidates: &[PathBuf], path_var: Option<OsString>) -> Result<PathBuf> {
    if let Some(found) = candidates.iter().find(|p| p.is_file()) {
        tracing::debug!("Found interpreter at {}", found.display());
        return Ok(found.clone());
    }

    path_var
        .and_then(|paths| find_on_path(&paths, PATH_EXECUTABLES))
        .ok_or(ConverterError::MissingInterpreter)
}

/// PATH の各ディレクトリから実行ファイル名を探す
fn find_on_path(paths: &OsString, names: &[&str]) -> Option<PathBuf> {
    std::env::split_paths(paths)
        .flat_map(|dir| names.iter().map(move |name| dir.join(name)))
        .find(|candidate| candidate.is_file())
}

/// 自動化スクリプトと同じディレクトリに置く付属ライブラリの既定名
pub const DEFAULT_COMPANION: &str = "IME.ahk";

/// 存在確認済みの自動化スクリプト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutomationScript {
    script: PathBuf,
    companion: PathBuf,
}

impl AutomationScript {
    /// スクリプト本体と付属ライブラリの存在を確認する
    pub fn resolve(script: impl Into<PathBuf>, companion_name: &str) -> Result<Self> {
        let script = script.into();
        if !script.is_file() {
            return Err(ConverterError::MissingScript(script));
        }
        let dir = script
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let companion = dir.join(companion_name);
        if !companion.is_file() {
            return Err(ConverterError::MissingCompanion(companion));
        }
        Ok(Self { script, companion })
    }

    pub fn script(&self) -> &Path {
        &self.script
    }

    pub fn companion(&self) -> &Path {
        &self.companion
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// 候補パスは先頭から順に採用される
    #[test]
    fn first_existing_candidate_wins() {
        let tmp = TempDir::new().unwrap();
        let first = tmp.path().join("AutoHotkeyU64.exe");
        let second = tmp.path().join("AutoHotkey.exe");
        fs::write(&second, b"").unwrap();
        fs::write(&first, b"").unwrap();

        let found = locate_in(&[tmp.path().join("missing.exe"), first.clone(), second], None)
            .unwrap();
        assert_eq!(found, first);
    }

    /// 候補がなければ PATH から探す
    #[test]
    fn falls_back_to_path_lookup() {
        let tmp = TempDir::new().unwrap();
        let exe = tmp.path().join("AutoHotkey.exe");
        fs::write(&exe, b"").unwrap();

        let path_var = std::env::join_paths([tmp.path()]).unwrap();
        let found = locate_in(&[], Some(path_var)).unwrap();
        assert_eq!(found, exe);
    }

    /// どこにもなければ MissingInterpreter
    #[test]
    fn reports_missing_interpreter() {
        let tmp = TempDir::new().unwrap();
        let path_var = std::env::join_paths([tmp.path()]).unwrap();
        let err = locate_in(&[tmp.path().join("nope.exe")], Some(path_var)).unwrap_err();
        assert!(matches!(err, ConverterError::MissingInterpreter));
    }

    /// 明示指定されたパスが最優先
    #[test]
    fn override_path_takes_precedence() {
        let tmp = TempDir::new().unwrap();
        let exe = tmp.path().join("custom-ahk");
        fs::write(&exe, b"").unwrap();
        assert_eq!(locate_interpreter(Some(exe.as_path())).unwrap(), exe);
    }

    /// スクリプト本体と付属ライブラリの両方が必要
    #[test]
    fn script_requires_companion() {
        let tmp = TempDir::new().unwrap();
        let script = tmp.path().join("kanakanji.ahk");

        let err = AutomationScript::resolve(&script, DEFAULT_COMPANION).unwrap_err();
        assert!(matches!(err, ConverterError::MissingScript(_)));

        fs::write(&script, b"").unwrap();
        let err = AutomationScript::resolve(&script, DEFAULT_COMPANION).unwrap_err();
        assert!(matches!(err, ConverterError::MissingCompanion(p) if p.ends_with(DEFAULT_COMPANION)));

        fs::write(tmp.path().join(DEFAULT_COMPANION), b"").unwrap();
        let resolved = AutomationScript::resolve(&script, DEFAULT_COMPANION).unwrap();
        assert_eq!(resolved.script(), script.as_path());
    }
}
