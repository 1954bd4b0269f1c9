// データセット分割（training / validation）内のラベル画像列挙

use crate::core::{PrepError, PrepResult};
use crate::store::EDGE_PREFIX;
use rand::seq::SliceRandom;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 分割ディレクトリ直下のラベル画像を列挙する
///
/// ディスパッチ順を再現可能にするためソートして返す（処理順自体に
/// 意味はない）。`EDGE_PREFIX` 付きのファイルは過去の実行で生成された
/// マスクなので除外する。再実行してもマスクのマスクは作られない。
pub fn list_label_paths(split_dir: &Path) -> PrepResult<Vec<PathBuf>> {
    if !split_dir.is_dir() {
        return Err(PrepError::not_found(split_dir.to_string_lossy()));
    }

    let mut paths = Vec::new();
    for entry in WalkDir::new(split_dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| {
            PrepError::decode(split_dir.to_string_lossy(), anyhow::anyhow!(e))
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if name.starts_with(EDGE_PREFIX) {
            continue;
        }

        if let Some(extension) = entry.path().extension() {
            let ext = extension.to_string_lossy().to_lowercase();
            if is_image_extension(&ext) {
                paths.push(entry.path().to_path_buf());
            }
        }
    }

    paths.sort();
    Ok(paths)
}

fn is_image_extension(extension: &str) -> bool {
    matches!(
        extension,
        "jpg" | "jpeg" | "png" | "gif" | "bmp" | "tiff" | "webp"
    )
}

/// 可視化用にランダムな (入力画像, ラベル画像) ペアのパスを選ぶ
///
/// 入力画像ディレクトリからランダムに1枚選び、同じ例IDのラベルを
/// アノテーションディレクトリ側で探す。ラベルはPNG規約。
pub fn random_example_paths(
    images_dir: &Path,
    annotations_dir: &Path,
) -> PrepResult<(PathBuf, PathBuf)> {
    let images = list_label_paths(images_dir)?;
    let image_path = images
        .choose(&mut rand::thread_rng())
        .cloned()
        .ok_or_else(|| PrepError::not_found(images_dir.to_string_lossy()))?;

    let example_id = image_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let label_path = annotations_dir.join(format!("{example_id}.png"));

    Ok((image_path, label_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_list_label_paths_sorted_and_filtered() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.png"), b"dummy").unwrap();
        fs::write(dir.path().join("a.png"), b"dummy").unwrap();
        fs::write(dir.path().join("notes.txt"), b"dummy").unwrap();
        fs::write(dir.path().join("edge_a.png"), b"dummy").unwrap();

        // 直下のみが対象
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        fs::write(nested.join("c.png"), b"dummy").unwrap();

        let paths = list_label_paths(dir.path()).unwrap();
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.png", "b.png"]);
    }

    #[test]
    fn test_missing_directory_is_not_found() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("no_such_split");
        assert!(matches!(
            list_label_paths(&missing),
            Err(PrepError::NotFound { .. })
        ));
    }

    #[test]
    fn test_empty_directory_is_ok() {
        let dir = tempdir().unwrap();
        assert!(list_label_paths(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_random_example_pairing() {
        let dir = tempdir().unwrap();
        let images = dir.path().join("images");
        let annotations = dir.path().join("annotations");
        fs::create_dir_all(&images).unwrap();
        fs::create_dir_all(&annotations).unwrap();
        fs::write(images.join("ADE_train_00000042.jpg"), b"dummy").unwrap();
        fs::write(annotations.join("ADE_train_00000042.png"), b"dummy").unwrap();

        let (image_path, label_path) = random_example_paths(&images, &annotations).unwrap();
        assert!(image_path.ends_with("ADE_train_00000042.jpg"));
        assert!(label_path.ends_with("ADE_train_00000042.png"));
    }

    #[test]
    fn test_random_example_empty_directory() {
        let dir = tempdir().unwrap();
        let images = dir.path().join("images");
        fs::create_dir_all(&images).unwrap();

        let result = random_example_paths(&images, dir.path());
        assert!(matches!(result, Err(PrepError::NotFound { .. })));
    }
}
