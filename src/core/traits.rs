// バッチ処理の抽象化インターフェース定義

use async_trait::async_trait;
use mockall::automock;
use std::path::Path;

/// バッチ実行の設定を抽象化するトレイト
#[automock]
pub trait BatchConfig: Send + Sync {
    /// ワーカー（並列実行ユニット）の数を取得
    fn worker_count(&self) -> usize;

    /// 作業キュー・結果キューのバッファサイズを取得
    fn channel_buffer_size(&self) -> usize;

    /// 進捗報告を有効にするかどうか
    fn enable_progress_reporting(&self) -> bool;
}

impl BatchConfig for Box<dyn BatchConfig> {
    fn worker_count(&self) -> usize {
        self.as_ref().worker_count()
    }

    fn channel_buffer_size(&self) -> usize {
        self.as_ref().channel_buffer_size()
    }

    fn enable_progress_reporting(&self) -> bool {
        self.as_ref().enable_progress_reporting()
    }
}

/// 進捗報告の抽象化トレイト
///
/// 呼び出すのはコレクタータスクのみ。ワーカーが直接コンソールへ
/// 書き込むことはなく、出力の混線は起きない。
#[automock]
#[async_trait]
pub trait ProgressReporter: Send + Sync {
    /// 処理開始時の報告
    async fn report_started(&self, total_files: usize);

    /// 進捗更新の報告（1ファイル完了ごとに呼ばれる）
    async fn report_progress(&self, completed: usize, total: usize);

    /// ファイル単位のエラー報告
    async fn report_error(&self, file_path: &Path, error: &str);

    /// 処理完了時の報告
    async fn report_completed(&self, total_processed: usize, total_errors: usize);
}

#[async_trait]
impl ProgressReporter for Box<dyn ProgressReporter> {
    async fn report_started(&self, total_files: usize) {
        self.as_ref().report_started(total_files).await
    }

    async fn report_progress(&self, completed: usize, total: usize) {
        self.as_ref().report_progress(completed, total).await
    }

    async fn report_error(&self, file_path: &Path, error: &str) {
        self.as_ref().report_error(file_path, error).await
    }

    async fn report_completed(&self, total_processed: usize, total_errors: usize) {
        self.as_ref().report_completed(total_processed, total_errors).await
    }
}
