// ローカルファイルシステム用のラベル画像ストア

use super::LabelImageStore;
use crate::core::{EdgeMask, LabelMap, PrepError, PrepResult};
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use image::{DynamicImage, GrayImage, ImageFormat};
use std::io::Write as _;
use std::path::Path;

/// `image` クレートでPNG等を読み書きするローカル実装
///
/// デコード・エンコードはブロッキング処理なので spawn_blocking 上で行う。
#[derive(Debug, Clone, Default)]
pub struct LocalLabelStore;

impl LocalLabelStore {
    pub fn new() -> Self {
        Self
    }

    fn decode_label(path: &Path) -> PrepResult<LabelMap> {
        if !path.exists() {
            return Err(PrepError::not_found(path.to_string_lossy()));
        }

        let image = image::open(path)
            .with_context(|| format!("画像として開けません: {}", path.display()))
            .map_err(|e| PrepError::decode(path.to_string_lossy(), e))?;

        // ラベルは単一チャンネルの整数画像のみ受け付ける
        let label = match image {
            DynamicImage::ImageLuma8(buf) => {
                let (w, h) = buf.dimensions();
                let data = buf.into_raw().into_iter().map(u16::from).collect();
                LabelMap::from_raw(w, h, data)?
            }
            DynamicImage::ImageLuma16(buf) => {
                let (w, h) = buf.dimensions();
                LabelMap::from_raw(w, h, buf.into_raw())?
            }
            other => {
                return Err(PrepError::decode(
                    path.to_string_lossy(),
                    anyhow!(
                        "単一チャンネルのラベル画像が必要ですが {:?} 形式でした",
                        other.color()
                    ),
                ));
            }
        };

        Ok(label)
    }

    fn encode_mask(path: &Path, mask: &EdgeMask) -> PrepResult<()> {
        let to_write_error = |e: anyhow::Error| PrepError::write(path.to_string_lossy(), e);

        let image = GrayImage::from_raw(mask.width(), mask.height(), mask.pixels().to_vec())
            .ok_or_else(|| anyhow!("マスクバッファのサイズが不正です"))
            .map_err(to_write_error)?;

        let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
        let mut tmp = match dir {
            Some(dir) => tempfile::NamedTempFile::new_in(dir),
            None => tempfile::NamedTempFile::new(),
        }
        .context("一時ファイルを作成できません")
        .map_err(to_write_error)?;

        let mut encoded = std::io::Cursor::new(Vec::new());
        DynamicImage::ImageLuma8(image)
            .write_to(&mut encoded, ImageFormat::Png)
            .context("PNGエンコードに失敗しました")
            .map_err(to_write_error)?;

        tmp.write_all(encoded.get_ref())
            .and_then(|_| tmp.flush())
            .context("一時ファイルへの書き込みに失敗しました")
            .map_err(to_write_error)?;

        // rename による一括公開。読み手が途中状態を見ることはない
        tmp.persist(path)
            .map_err(|e| to_write_error(anyhow!(e).context("最終パスへの移動に失敗しました")))?;

        Ok(())
    }
}

#[async_trait]
impl LabelImageStore for LocalLabelStore {
    async fn read_label(&self, path: &Path) -> PrepResult<LabelMap> {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || Self::decode_label(&path)).await?
    }

    async fn write_mask(&self, path: &Path, mask: &EdgeMask) -> PrepResult<()> {
        let path = path.to_path_buf();
        let mask = mask.clone();
        tokio::task::spawn_blocking(move || Self::encode_mask(&path, &mask)).await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use std::fs;
    use tempfile::tempdir;

    fn write_gray_png(path: &Path, width: u32, height: u32, f: impl Fn(u32, u32) -> u8) {
        let img = GrayImage::from_fn(width, height, |x, y| Luma([f(x, y)]));
        img.save(path).unwrap();
    }

    #[tokio::test]
    async fn test_read_label_luma8() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("label.png");
        write_gray_png(&path, 4, 3, |x, y| (x + y) as u8);

        let store = LocalLabelStore::new();
        let label = store.read_label(&path).await.unwrap();

        assert_eq!(label.width(), 4);
        assert_eq!(label.height(), 3);
        assert_eq!(label.get(0, 0), 0);
        assert_eq!(label.get(3, 2), 5);
    }

    #[tokio::test]
    async fn test_read_missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let store = LocalLabelStore::new();

        let result = store.read_label(&dir.path().join("no_such.png")).await;
        assert!(matches!(result, Err(PrepError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_read_corrupt_file_is_decode_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.png");
        fs::write(&path, b"INVALID_PNG_DATA").unwrap();

        let store = LocalLabelStore::new();
        let result = store.read_label(&path).await;
        assert!(matches!(result, Err(PrepError::Decode { .. })));
    }

    #[tokio::test]
    async fn test_read_rgb_file_is_decode_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("color.png");
        let rgb = image::RgbImage::from_fn(2, 2, |x, _| image::Rgb([x as u8, 0, 255]));
        rgb.save(&path).unwrap();

        let store = LocalLabelStore::new();
        let result = store.read_label(&path).await;
        assert!(matches!(result, Err(PrepError::Decode { .. })));
    }

    #[tokio::test]
    async fn test_write_then_read_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("edge_label.png");
        let mask = EdgeMask::from_raw(3, 2, vec![0, 1, 1, 0, 1, 0]);

        let store = LocalLabelStore::new();
        store.write_mask(&path, &mask).await.unwrap();

        let reread = store.read_label(&path).await.unwrap();
        assert_eq!(reread.width(), 3);
        assert_eq!(reread.height(), 2);
        let values: Vec<u16> = reread.pixels().to_vec();
        assert_eq!(values, vec![0, 1, 1, 0, 1, 0]);
    }

    #[tokio::test]
    async fn test_write_overwrites_existing_mask() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("edge_label.png");
        let store = LocalLabelStore::new();

        store
            .write_mask(&path, &EdgeMask::from_raw(2, 1, vec![1, 1]))
            .await
            .unwrap();
        store
            .write_mask(&path, &EdgeMask::from_raw(2, 1, vec![0, 1]))
            .await
            .unwrap();

        let reread = store.read_label(&path).await.unwrap();
        assert_eq!(reread.pixels(), &[0, 1]);
    }

    #[tokio::test]
    async fn test_write_to_missing_directory_is_write_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("no_such_dir").join("edge_label.png");
        let store = LocalLabelStore::new();

        let result = store
            .write_mask(&path, &EdgeMask::from_raw(1, 1, vec![1]))
            .await;
        assert!(matches!(result, Err(PrepError::Write { .. })));
    }
}
