// Producer-Consumer パイプライン
//
// Producer がラベルパスを作業キューへ流し、固定数のワーカーが
// 読み込み→境界抽出→書き込みを1ファイルずつ完遂する。進捗の集計と
// 報告は単一のコレクタータスクだけが行う。

use crate::boundary::BoundaryExtractor;
use crate::core::{
    BatchConfig, BatchReport, FileFailure, FileOutcome, PrepError, PrepResult, ProgressReporter,
};
use crate::store::{edge_path, LabelImageStore};
use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Instant;
use tokio::sync::{mpsc, Mutex};

/// 1ファイル分のパイプライン（読み込み→抽出→書き込み）
///
/// ファイル単位の失敗（NotFound / Decode / Write / InvalidLabel）は
/// FileOutcome::Failed として返し、ワーカーは次のファイルへ進む。
/// それ以外（Task のパニック等）はパイプラインの欠陥なので Err で
/// 伝播させ、バッチ全体を致命的エラーとして止める。
/// 境界抽出はCPU処理なので blocking スレッドで実行する。
async fn process_label_file<S>(
    store: &S,
    extractor: Arc<BoundaryExtractor>,
    label_path: PathBuf,
) -> PrepResult<FileOutcome>
where
    S: LabelImageStore,
{
    let destination = edge_path(&label_path);

    let result: PrepResult<()> = async {
        let label = store.read_label(&label_path).await?;
        let mask =
            tokio::task::spawn_blocking(move || extractor.compute(&label)).await??;
        store.write_mask(&destination, &mask).await?;
        Ok(())
    }
    .await;

    match result {
        Ok(()) => Ok(FileOutcome::Succeeded {
            edge_path: destination,
            label_path,
        }),
        Err(error) if error.is_per_file() => Ok(FileOutcome::Failed { label_path, error }),
        Err(error) => Err(error),
    }
}

/// Producer: ラベルパスを作業キューへ配信
fn spawn_producer(
    paths: Vec<PathBuf>,
    work_tx: mpsc::Sender<PathBuf>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        for path in paths {
            if work_tx.send(path).await.is_err() {
                // 受信側が閉じた場合は正常終了
                break;
            }
        }
        // work_tx のドロップがキュー終了のシグナル
    })
}

/// ワーカープール: 共有キューから1件ずつ取り、完遂してから次を取る
fn spawn_workers<S>(
    store: Arc<S>,
    extractor: Arc<BoundaryExtractor>,
    work_rx: mpsc::Receiver<PathBuf>,
    result_tx: mpsc::Sender<FileOutcome>,
    worker_count: usize,
) -> Vec<tokio::task::JoinHandle<PrepResult<()>>>
where
    S: LabelImageStore + 'static,
{
    let work_rx = Arc::new(Mutex::new(work_rx));
    let mut handles = Vec::with_capacity(worker_count);

    for _ in 0..worker_count {
        let store = Arc::clone(&store);
        let extractor = Arc::clone(&extractor);
        let work_rx = Arc::clone(&work_rx);
        let result_tx = result_tx.clone();

        handles.push(tokio::spawn(async move {
            loop {
                let label_path = {
                    let mut rx = work_rx.lock().await;
                    match rx.recv().await {
                        Some(path) => path,
                        None => break,
                    }
                };

                let outcome =
                    process_label_file(store.as_ref(), Arc::clone(&extractor), label_path).await?;

                if result_tx.send(outcome).await.is_err() {
                    break;
                }
            }
            Ok(())
        }));
    }

    handles
}

/// コレクター: 完了集計と進捗報告の唯一のオーナー
fn spawn_collector<R>(
    mut result_rx: mpsc::Receiver<FileOutcome>,
    total: usize,
    completed: Arc<AtomicUsize>,
    reporter: Arc<R>,
    report_enabled: bool,
) -> tokio::task::JoinHandle<(usize, Vec<FileFailure>)>
where
    R: ProgressReporter + 'static,
{
    tokio::spawn(async move {
        let mut succeeded = 0usize;
        let mut failures = Vec::new();

        while let Some(outcome) = result_rx.recv().await {
            // どのワーカーが終えたかに関わらず、完了ごとにちょうど1回加算
            let done = completed.fetch_add(1, Ordering::SeqCst) + 1;

            match outcome {
                FileOutcome::Succeeded { .. } => succeeded += 1,
                FileOutcome::Failed { label_path, error } => {
                    if report_enabled {
                        reporter
                            .report_error(&label_path, &error.to_string())
                            .await;
                    }
                    failures.push(FileFailure {
                        path: label_path,
                        kind: error.kind(),
                        message: error.to_string(),
                    });
                }
            }

            if report_enabled {
                reporter.report_progress(done, total).await;
            }
        }

        (succeeded, failures)
    })
}

/// パイプライン全体を実行してバッチ報告を返す
pub(crate) async fn execute<S, C, R>(
    store: Arc<S>,
    extractor: Arc<BoundaryExtractor>,
    paths: Vec<PathBuf>,
    config: &C,
    reporter: Arc<R>,
) -> PrepResult<BatchReport>
where
    S: LabelImageStore + 'static,
    C: BatchConfig,
    R: ProgressReporter + 'static,
{
    let started_at = chrono::Utc::now();
    let start = Instant::now();
    let total = paths.len();
    let report_enabled = config.enable_progress_reporting();

    if report_enabled {
        reporter.report_started(total).await;
    }

    let (work_tx, work_rx) = mpsc::channel::<PathBuf>(config.channel_buffer_size());
    let (result_tx, result_rx) = mpsc::channel::<FileOutcome>(config.channel_buffer_size());
    let completed = Arc::new(AtomicUsize::new(0));

    let producer = spawn_producer(paths, work_tx);
    let workers = spawn_workers(
        store,
        extractor,
        work_rx,
        result_tx.clone(),
        config.worker_count(),
    );
    let collector = spawn_collector(
        result_rx,
        total,
        Arc::clone(&completed),
        Arc::clone(&reporter),
        report_enabled,
    );

    producer.await?;
    for handle in workers {
        handle.await??;
    }

    // 全ワーカー終了後に result_tx を閉じてコレクターへ完了を通知
    drop(result_tx);

    let (succeeded, failures) = collector.await?;

    if report_enabled {
        reporter.report_completed(succeeded, failures.len()).await;
    }

    if completed.load(Ordering::SeqCst) != total {
        return Err(PrepError::channel(format!(
            "完了数 {} が入力数 {total} と一致しません",
            completed.load(Ordering::SeqCst)
        )));
    }

    Ok(BatchReport {
        total,
        succeeded,
        failures,
        started_at,
        elapsed_ms: start.elapsed().as_millis() as u64,
    })
}
