// データセットディレクトリのツリー表示
//
// バッチ完了後に作業者がレイアウトを確認するためのもの。ファイルが
// 大量にあるディレクトリは件数だけまとめる。

use crate::core::{PrepError, PrepResult};
use anyhow::Context;
use std::path::Path;

/// 1ディレクトリにつき個別表示するファイル数の上限
const MAX_LISTED_FILES: usize = 100;

/// ディレクトリツリーをインデント付き文字列に描画する
pub fn render_tree(root: &Path) -> PrepResult<String> {
    if !root.is_dir() {
        return Err(PrepError::not_found(root.to_string_lossy()));
    }

    let mut out = String::new();
    let name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.to_string_lossy().into_owned());
    out.push_str(&name);
    out.push_str("/\n");
    render_dir(root, 1, &mut out)?;
    Ok(out)
}

fn render_dir(dir: &Path, depth: usize, out: &mut String) -> PrepResult<()> {
    let indent = "    ".repeat(depth);

    let mut files = Vec::new();
    let mut dirs = Vec::new();
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("読み取れません: {}", dir.display()))
        .map_err(|e| PrepError::decode(dir.to_string_lossy(), e))?;
    for entry in entries {
        let entry = entry
            .with_context(|| format!("読み取れません: {}", dir.display()))
            .map_err(|e| PrepError::decode(dir.to_string_lossy(), e))?;
        let path = entry.path();
        if path.is_dir() {
            dirs.push(path);
        } else {
            files.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    files.sort();
    dirs.sort();

    if files.len() > MAX_LISTED_FILES {
        out.push_str(&format!("{indent}#{} files\n", files.len()));
    } else {
        for file in files {
            out.push_str(&format!("{indent}{file}\n"));
        }
    }

    for sub in dirs {
        let name = sub
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        out.push_str(&format!("{indent}{name}/\n"));
        render_dir(&sub, depth + 1, out)?;
    }

    Ok(())
}
