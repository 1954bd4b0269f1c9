// バッチ設定の具象実装

use crate::core::BatchConfig;

/// デフォルトのワーカー数
///
/// ファイル1枚あたりの処理が重い（距離変換 x クラス数）ため、
/// 小さめの固定値を既定とする。
pub const DEFAULT_WORKER_COUNT: usize = 4;

const DEFAULT_BUFFER_SIZE: usize = 100;

/// ビルダー形式のデフォルト設定実装
#[derive(Debug, Clone)]
pub struct DefaultBatchConfig {
    worker_count: usize,
    buffer_size: usize,
    enable_progress: bool,
}

impl DefaultBatchConfig {
    /// ワーカー数 0 は「論理CPU数に合わせる」の意味
    pub fn with_workers(mut self, worker_count: usize) -> Self {
        self.worker_count = if worker_count == 0 {
            num_cpus::get().max(1)
        } else {
            worker_count
        };
        self
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn with_progress_reporting(mut self, enable: bool) -> Self {
        self.enable_progress = enable;
        self
    }
}

impl Default for DefaultBatchConfig {
    fn default() -> Self {
        Self {
            worker_count: DEFAULT_WORKER_COUNT,
            buffer_size: DEFAULT_BUFFER_SIZE,
            enable_progress: true,
        }
    }
}

impl BatchConfig for DefaultBatchConfig {
    fn worker_count(&self) -> usize {
        self.worker_count
    }

    fn channel_buffer_size(&self) -> usize {
        self.buffer_size
    }

    fn enable_progress_reporting(&self) -> bool {
        self.enable_progress
    }
}
