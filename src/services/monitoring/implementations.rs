// 進捗監視の具象実装

use crate::core::{ProgressReporter, RunSummary};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

/// ログ出力による進捗報告実装
///
/// バッチごとに呼ばれるため、期待行数の10%刻みでのみ出力する。
#[derive(Debug, Default)]
pub struct ConsoleProgressReporter {
    last_decile: AtomicUsize,
}

impl ConsoleProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 新しい10%区間に入った場合のみその区間を返す
    fn crossed_decile(&self, rows_written: usize, expected_rows: usize) -> Option<usize> {
        if expected_rows == 0 {
            return None;
        }
        let decile = (rows_written.min(expected_rows) * 10) / expected_rows;
        let previous = self.last_decile.fetch_max(decile, Ordering::Relaxed);
        (decile > previous).then_some(decile)
    }
}

#[async_trait]
impl ProgressReporter for ConsoleProgressReporter {
    async fn report_started(&self, point_count: usize, worker_count: usize) {
        self.last_decile.store(0, Ordering::Relaxed);
        log::info!("Computing distances for {point_count} points with {worker_count} workers");
    }

    async fn report_progress(&self, rows_written: usize, expected_rows: usize) {
        if let Some(decile) = self.crossed_decile(rows_written, expected_rows) {
            log::info!(
                "Progress: {rows_written}/{expected_rows} rows ({}%)",
                decile * 10
            );
        }
    }

    async fn report_completed(&self, summary: &RunSummary) {
        log::info!(
            "Completed! Rows: {}, Batches: {}, Elapsed: {}ms",
            summary.rows_written,
            summary.batches_flushed,
            summary.elapsed_ms
        );
    }
}

/// 何もしない進捗報告実装（テスト・ベンチマーク用）
#[derive(Debug, Default, Clone)]
pub struct NoOpProgressReporter;

impl NoOpProgressReporter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProgressReporter for NoOpProgressReporter {
    async fn report_started(&self, _point_count: usize, _worker_count: usize) {
        // 何もしない
    }

    async fn report_progress(&self, _rows_written: usize, _expected_rows: usize) {
        // 何もしない
    }

    async fn report_completed(&self, _summary: &RunSummary) {
        // 何もしない
    }
}
