// Producer - WorkQueueへの起点配信

use crate::core::{PipelineResult, PointTable, WorkItem};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Dispatcher: テーブルの全地点をWorkQueueへ送る
///
/// 送信完了後に`work_tx`をドロップしてキューを閉じる。送信数を返す。
pub fn spawn_dispatcher(
    table: Arc<PointTable>,
    work_tx: mpsc::Sender<WorkItem>,
) -> tokio::task::JoinHandle<PipelineResult<usize>> {
    tokio::spawn(async move {
        let mut dispatched = 0;
        for (position, point) in table.iter().enumerate() {
            let item = WorkItem {
                position,
                point: point.clone(),
            };
            if work_tx.send(item).await.is_err() {
                // 全ワーカーが終了済み（結果側の失敗）。エラーは結果側から報告される
                log::debug!("WorkQueueの受信側が閉じられました: {dispatched}件配信済み");
                break;
            }
            dispatched += 1;
        }
        Ok(dispatched)
    })
}
