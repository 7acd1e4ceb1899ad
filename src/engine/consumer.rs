// Consumer - 並列ワーカープール

use crate::{
    core::{
        DistanceResult, DistanceUnit, PairMode, PipelineResult, PointTable, WorkItem,
        WorkerReport,
    },
    services::processing::process_source,
};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

/// 全ワーカーで共有するWorkQueueの受信側
pub type SharedWorkQueue = Arc<Mutex<mpsc::Receiver<WorkItem>>>;

/// 単一ワーカー
///
/// WorkQueueが閉じられて空になるまで起点を取り出し、テーブルの全宛先との距離を送る。
/// 終了時に完了報告を1回だけ返す。
pub fn spawn_single_worker(
    worker_id: usize,
    table: Arc<PointTable>,
    work_rx: SharedWorkQueue,
    result_tx: mpsc::Sender<DistanceResult>,
    unit: DistanceUnit,
    mode: PairMode,
) -> tokio::task::JoinHandle<PipelineResult<WorkerReport>> {
    tokio::spawn(async move {
        let mut report = WorkerReport {
            worker_id,
            ..WorkerReport::default()
        };

        loop {
            // 次の起点を取得（ロックは受信の間だけ保持）
            let item = {
                let mut rx = work_rx.lock().await;
                match rx.recv().await {
                    Some(item) => item,
                    None => break,
                }
            };

            match process_source(&item, &table, unit, mode, &result_tx).await {
                Some(sent) => {
                    report.sources_processed += 1;
                    report.pairs_computed += sent;
                }
                None => {
                    // 結果チャンネルが閉じられた場合は終了
                    log::debug!("worker {worker_id}: 結果チャンネルが閉じられました");
                    break;
                }
            }
        }

        log::debug!(
            "worker {worker_id} 完了: 起点{}件, ペア{}件",
            report.sources_processed,
            report.pairs_computed
        );
        Ok(report)
    })
}

/// ワーカープールを起動
pub fn spawn_workers(
    table: Arc<PointTable>,
    work_rx: mpsc::Receiver<WorkItem>,
    result_tx: mpsc::Sender<DistanceResult>,
    worker_count: usize,
    unit: DistanceUnit,
    mode: PairMode,
) -> Vec<tokio::task::JoinHandle<PipelineResult<WorkerReport>>> {
    let work_rx: SharedWorkQueue = Arc::new(Mutex::new(work_rx));

    (0..worker_count)
        .map(|worker_id| {
            spawn_single_worker(
                worker_id,
                Arc::clone(&table),
                Arc::clone(&work_rx),
                result_tx.clone(),
                unit,
                mode,
            )
        })
        .collect()
}
