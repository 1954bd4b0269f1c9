// 前処理で扱うデータ型定義

use super::error::{ErrorKind, PrepError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// クラスラベルマップ
///
/// 1ピクセルにつき1つのクラスID（`[0, n_classes)` の整数）を持つ2次元グリッド。
/// Luma8 / Luma16 どちらの入力も受けるため内部表現は u16。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMap {
    width: u32,
    height: u32,
    data: Vec<u16>,
}

impl LabelMap {
    /// 行優先のピクセル列からラベルマップを作成
    pub fn from_raw(width: u32, height: u32, data: Vec<u16>) -> Result<Self, PrepError> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(PrepError::configuration(format!(
                "ラベルマップのサイズ不一致: {}x{} には {expected} ピクセルが必要ですが {} を受け取りました",
                width,
                height,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// 指定位置のクラスID（範囲外チェックは呼び出し側の責任）
    pub fn get(&self, x: u32, y: u32) -> u16 {
        self.data[y as usize * self.width as usize + x as usize]
    }

    pub fn pixels(&self) -> &[u16] {
        &self.data
    }
}

/// 二値エッジマスク
///
/// 元のラベルマップと同じ空間サイズで、値は {0, 1} のみ。
/// 1 は「半径 radius 以内にクラス境界がある」ことを意味する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeMask {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl EdgeMask {
    pub(crate) fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width as usize * height as usize);
        debug_assert!(data.iter().all(|&v| v <= 1));
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.data[y as usize * self.width as usize + x as usize]
    }

    pub fn pixels(&self) -> &[u8] {
        &self.data
    }
}

/// 個別ファイル処理の結果（ワーカーからコレクターへ送られるメッセージ）
#[derive(Debug)]
pub enum FileOutcome {
    Succeeded {
        label_path: PathBuf,
        edge_path: PathBuf,
    },
    Failed {
        label_path: PathBuf,
        error: PrepError,
    },
}

/// バッチ中に失敗した1ファイルの記録
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub kind: ErrorKind,
    pub message: String,
}

/// バッチ実行全体のサマリー
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub total: usize,
    pub succeeded: usize,
    pub failures: Vec<FileFailure>,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
}

impl BatchReport {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}
