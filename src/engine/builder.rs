// BatchEdgeMapBuilder - 分割全体のエッジマップ一括生成

use super::pipeline;
use crate::boundary::BoundaryExtractor;
use crate::core::{BatchConfig, BatchReport, PrepError, PrepResult, ProgressReporter};
use crate::split::list_label_paths;
use crate::store::LabelImageStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// ラベル画像の集合をワーカープールへ分配し、1枚ごとに
/// 読み込み→境界抽出→書き込みを実行するビルダー
///
/// 依存関係はすべてコンストラクタで注入され、並列実行のため
/// Arc で共有される。ファイル単位の失敗は報告へ記録するだけで
/// バッチは続行する。
pub struct BatchEdgeMapBuilder<S, C, R> {
    store: Arc<S>,
    extractor: Arc<BoundaryExtractor>,
    config: Arc<C>,
    reporter: Arc<R>,
}

impl<S, C, R> BatchEdgeMapBuilder<S, C, R>
where
    S: LabelImageStore + 'static,
    C: BatchConfig,
    R: ProgressReporter + 'static,
{
    pub fn new(store: S, extractor: BoundaryExtractor, config: C, reporter: R) -> Self {
        Self {
            store: Arc::new(store),
            extractor: Arc::new(extractor),
            config: Arc::new(config),
            reporter: Arc::new(reporter),
        }
    }

    /// 指定されたラベルパス列を処理する
    pub async fn run(&self, paths: Vec<PathBuf>) -> PrepResult<BatchReport> {
        self.validate_config()?;

        pipeline::execute(
            Arc::clone(&self.store),
            Arc::clone(&self.extractor),
            paths,
            self.config.as_ref(),
            Arc::clone(&self.reporter),
        )
        .await
    }

    /// 分割ディレクトリを列挙してから処理する
    ///
    /// ディレクトリ自体が無い場合は列挙できないためバッチ全体の
    /// エラーになる（ファイル単位の隔離はここでは働かない）。
    pub async fn run_split(&self, split_dir: &Path) -> PrepResult<BatchReport> {
        let paths = list_label_paths(split_dir)?;
        self.run(paths).await
    }

    fn validate_config(&self) -> PrepResult<()> {
        if self.config.worker_count() == 0 {
            return Err(PrepError::configuration(
                "ワーカー数は1以上である必要があります",
            ));
        }
        if self.config.channel_buffer_size() == 0 {
            return Err(PrepError::configuration(
                "チャンネルバッファサイズは1以上である必要があります",
            ));
        }
        Ok(())
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    pub fn extractor(&self) -> &BoundaryExtractor {
        &self.extractor
    }
}
