// ラベル画像ストレージの抽象化

use crate::core::{EdgeMask, LabelMap, PrepResult};
use async_trait::async_trait;
use mockall::automock;
use std::path::{Path, PathBuf};

pub mod local;

pub use local::LocalLabelStore;

/// エッジマスクのファイル名に付ける固定プレフィックス
///
/// 下流の消費者がラベル画像からマスクを発見するための規約であり、
/// バイト単位で一致している必要がある。
pub const EDGE_PREFIX: &str = "edge_";

/// ラベル画像パスから対応するエッジマスクのパスを導出する純粋関数
///
/// 同じディレクトリ内で、ベース名の先頭に `EDGE_PREFIX` を付けるだけ。
/// 決定的なので、何度計算しても同じ出力先になる。
pub fn edge_path(label_path: &Path) -> PathBuf {
    let name = label_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let edge_name = format!("{EDGE_PREFIX}{name}");
    match label_path.parent() {
        Some(dir) => dir.join(edge_name),
        None => PathBuf::from(edge_name),
    }
}

/// ラベル画像の読み込みとエッジマスクの書き込みを担うバックエンド
#[automock]
#[async_trait]
pub trait LabelImageStore: Send + Sync {
    /// ラベル画像を読み込む
    ///
    /// パスが存在しなければ `NotFound`、単一チャンネル画像として
    /// デコードできなければ `Decode` を返す。
    async fn read_label(&self, path: &Path) -> PrepResult<LabelMap>;

    /// エッジマスクを画像ファイルとして書き込む
    ///
    /// 後続の読み手から見てアトミックであること。途中まで書かれた
    /// ファイルが最終名で見えてはならない。
    async fn write_mask(&self, path: &Path, mask: &EdgeMask) -> PrepResult<()>;
}
