// クラス統計テーブルの正規化
//
// 配布物の objectInfo テキスト（ヘッダー行 + 空白区切りの
// id / ratio / train / val / names 列）を型付きテーブルに変換し、
// 学習コードが直接読めるJSONとして保存する。

use crate::core::{PrepError, PrepResult};
use anyhow::{anyhow, Context};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// 1クラス分の統計情報
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassInfo {
    /// データセット全体に占めるピクセル比率
    pub ratio: f64,
    /// 学習分割での出現画像数
    pub train: u64,
    /// 検証分割での出現画像数
    pub val: u64,
    /// セミコロン区切りのクラス名
    pub names: String,
}

/// クラスID -> 統計情報の検証済みテーブル
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassTable {
    generated_at: DateTime<Utc>,
    classes: BTreeMap<u16, ClassInfo>,
}

impl ClassTable {
    /// テキストテーブルを解析する（1行目はヘッダーとして捨てる）
    pub fn parse(text: &str) -> PrepResult<Self> {
        let mut classes = BTreeMap::new();

        for (line_no, line) in text.lines().enumerate().skip(1) {
            if line.trim().is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split_whitespace().collect();
            let row = (|| -> anyhow::Result<(u16, ClassInfo)> {
                if fields.len() < 5 {
                    return Err(anyhow!("5列必要ですが {} 列でした", fields.len()));
                }
                let id: u16 = fields[0].parse().context("クラスIDが整数ではありません")?;
                let info = ClassInfo {
                    ratio: fields[1].parse().context("ratio が数値ではありません")?,
                    train: fields[2].parse().context("train が整数ではありません")?,
                    val: fields[3].parse().context("val が整数ではありません")?,
                    names: fields[4].to_string(),
                };
                Ok((id, info))
            })()
            .map_err(|e| {
                PrepError::decode(
                    format!("objectInfo {} 行目", line_no + 1),
                    e,
                )
            })?;

            let (id, info) = row;
            if classes.insert(id, info).is_some() {
                return Err(PrepError::decode(
                    format!("objectInfo {} 行目", line_no + 1),
                    anyhow!("クラスID {id} が重複しています"),
                ));
            }
        }

        Ok(Self {
            generated_at: Utc::now(),
            classes,
        })
    }

    /// テキストファイルから読み込む
    pub fn load_txt(path: &Path) -> PrepResult<Self> {
        if !path.exists() {
            return Err(PrepError::not_found(path.to_string_lossy()));
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("読み込めません: {}", path.display()))
            .map_err(|e| PrepError::decode(path.to_string_lossy(), e))?;
        Self::parse(&text)
    }

    /// JSONとして保存する
    pub fn save_json(&self, path: &Path) -> PrepResult<()> {
        let json = serde_json::to_string_pretty(self)
            .context("JSONシリアライズに失敗しました")
            .map_err(|e| PrepError::write(path.to_string_lossy(), e))?;
        std::fs::write(path, json)
            .with_context(|| format!("書き込めません: {}", path.display()))
            .map_err(|e| PrepError::write(path.to_string_lossy(), e))
    }

    /// JSONから読み込む
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

    pub fn get(&self, class_id: u16) -> Option<&ClassInfo> {
        self.classes.get(&class_id)
    }

    /// 凡例表示用のクラス名（ID 0 は背景の「other」）
    pub fn name_of(&self, class_id: u16) -> &str {
        if class_id == 0 {
            return "other";
        }
        self.get(class_id).map(|c| c.names.as_str()).unwrap_or("?")
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
