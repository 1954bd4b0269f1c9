// カラーパレットの正規化と可視化
//
// 配布物のパレット行列（1行 = クラス1つ分のRGB）を、先頭に背景色
// （黒）を足した検証済みの配列へ正規化する。可視化用のラベル彩色と
// 凡例作成もここ。

use super::class_info::ClassTable;
use crate::core::{LabelMap, PrepError, PrepResult};
use anyhow::{anyhow, Context};
use chrono::{DateTime, Utc};
use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// クラスIDで引く読み取り専用のRGBパレット
///
/// インデックス0は常に背景（黒）。起動時に一度構築したら不変。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    generated_at: DateTime<Utc>,
    colors: Vec<[u8; 3]>,
}

impl Palette {
    /// クラス色の行列から構築する（背景行を先頭に追加する）
    pub fn from_class_rows(rows: Vec<[u8; 3]>) -> Self {
        let mut colors = Vec::with_capacity(rows.len() + 1);
        colors.push([0, 0, 0]);
        colors.extend(rows);
        Self {
            generated_at: Utc::now(),
            colors,
        }
    }

    /// カンマまたは空白区切りのテキスト（1行 = R G B）から読み込む
    ///
    /// `expected_classes` は背景を除いたクラス行数。数が合わない
    /// パレットはデータセットと不整合なので弾く。
    pub fn load_text(path: &Path, expected_classes: usize) -> PrepResult<Self> {
        if !path.exists() {
            return Err(PrepError::not_found(path.to_string_lossy()));
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("読み込めません: {}", path.display()))
            .map_err(|e| PrepError::decode(path.to_string_lossy(), e))?;

        let mut rows = Vec::new();
        for (line_no, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let parts: Vec<&str> = line
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty())
                .collect();
            let row = (|| -> anyhow::Result<[u8; 3]> {
                if parts.len() != 3 {
                    return Err(anyhow!("RGBの3値が必要ですが {} 値でした", parts.len()));
                }
                Ok([
                    parts[0].parse().context("Rが0-255ではありません")?,
                    parts[1].parse().context("Gが0-255ではありません")?,
                    parts[2].parse().context("Bが0-255ではありません")?,
                ])
            })()
            .map_err(|e| {
                PrepError::decode(format!("{} {} 行目", path.display(), line_no + 1), e)
            })?;
            rows.push(row);
        }

        if rows.len() != expected_classes {
            return Err(PrepError::decode(
                path.to_string_lossy(),
                anyhow!(
                    "クラス行数の不一致: {expected_classes} 行が必要ですが {} 行でした",
                    rows.len()
                ),
            ));
        }

        Ok(Self::from_class_rows(rows))
    }

    pub fn save_json(&self, path: &Path) -> PrepResult<()> {
        let json = serde_json::to_string_pretty(self)
            .context("JSONシリアライズに失敗しました")
            .map_err(|e| PrepError::write(path.to_string_lossy(), e))?;
        std::fs::write(path, json)
            .with_context(|| format!("書き込めません: {}", path.display()))
            .map_err(|e| PrepError::write(path.to_string_lossy(), e))
    }

    pub fn load_json(path: &Path) -> PrepResult<Self> {
        if !path.exists() {
            return Err(PrepError::not_found(path.to_string_lossy()));
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("読み込めません: {}", path.display()))
            .map_err(|e| PrepError::decode(path.to_string_lossy(), e))?;
        serde_json::from_str(&text)
            .context("JSONデシリアライズに失敗しました")
            .map_err(|e| PrepError::decode(path.to_string_lossy(), e))
    }

    /// 背景を含めたエントリ数
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// 範囲チェック付きの色引き
    pub fn color(&self, class_id: u16) -> Option<[u8; 3]> {
        self.colors.get(class_id as usize).copied()
    }

    /// ラベルマップをRGB画像へ彩色する
    pub fn colorize(&self, label: &LabelMap) -> PrepResult<RgbImage> {
        let width = label.width();
        let mut image = RgbImage::new(width, label.height());

        for (idx, &value) in label.pixels().iter().enumerate() {
            let color = self.color(value).ok_or(PrepError::InvalidLabel {
                value,
                x: (idx as u32) % width,
                y: (idx as u32) / width,
                n_classes: self.len(),
            })?;
            image.put_pixel((idx as u32) % width, (idx as u32) / width, image::Rgb(color));
        }

        Ok(image)
    }

    /// ラベルマップに出現するクラスの凡例を作る
    pub fn legend(&self, label: &LabelMap, table: &ClassTable) -> PrepResult<Vec<LegendEntry>> {
        let mut seen: Vec<u16> = label.pixels().to_vec();
        seen.sort_unstable();
        seen.dedup();

        seen.into_iter()
            .map(|class_id| {
                let color = self.color(class_id).ok_or(PrepError::InvalidLabel {
                    value: class_id,
                    x: 0,
                    y: 0,
                    n_classes: self.len(),
                })?;
                Ok(LegendEntry {
                    class_id,
                    name: table.name_of(class_id).to_string(),
                    color,
                })
            })
            .collect()
    }
}

/// 凡例の1エントリ
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub class_id: u16,
    pub name: String,
    pub color: [u8; 3],
}
