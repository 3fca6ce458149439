//! `/bin/sh` で動くスタブを AutoHotkey の代わりに使うためのヘルパー
#![allow(dead_code)]

use kanakanji::infrastructure::locator::{AutomationScript, DEFAULT_COMPANION};
use std::fs;
use std::path::{Path, PathBuf};

/// スタブを実行するインタプリタ
pub const SHELL: &str = "/bin/sh";

pub fn shell() -> PathBuf {
    PathBuf::from(SHELL)
}

/// スクリプト本体と付属ライブラリを書き出す
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).expect("write stub script");
    fs::write(dir.join(DEFAULT_COMPANION), "; companion library\n").expect("write companion");
    path
}

pub fn resolve(script: &Path) -> AutomationScript {
    AutomationScript::resolve(script, DEFAULT_COMPANION).expect("stub script resolves")
}

/// 「いがくようご」だけ変換し、それ以外はそのまま返す常駐スタブ
pub const BATCH_STUB: &str = r#"echo "INFO: ready settle=$1"
while IFS= read -r line; do
  echo "DEBUG: received $line"
  case "$line" in
    いがくようご) echo "医学用語" ;;
    *) echo "$line" ;;
  esac
done
"#;
