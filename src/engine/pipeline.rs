// Pipeline - Dispatcher → Worker×N → ResultSink の配線
// Coordinatorとしてキューとチャンネルを所有し、各コンポーネントへ明示的に渡す

use super::{consumer::spawn_workers, lifecycle::Lifecycle, producer::spawn_dispatcher};
use crate::{
    core::{
        DistanceError, DistanceResult, DistanceWriter, PipelineConfig, PipelineResult,
        PipelineState, PointTable, ProgressReporter, RunSummary, WorkItem, WorkerReport,
    },
    services::{config::validate_config, persistence::spawn_result_sink},
};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

/// 読み込み済みテーブルに対する計算パイプライン
pub struct DistancePipeline<C, R> {
    config: Arc<C>,
    reporter: Arc<R>,
}

impl<C, R> DistancePipeline<C, R>
where
    C: PipelineConfig,
    R: ProgressReporter + 'static,
{
    pub fn new(config: Arc<C>, reporter: Arc<R>) -> Self {
        Self { config, reporter }
    }

    /// テーブルの全ペアを計算して出力先へ書き込む
    ///
    /// `lifecycle`はLoading状態で渡す。成功時はDone、失敗時はAbortedで戻る。
    pub async fn execute<W>(
        &self,
        table: Arc<PointTable>,
        writer: Arc<W>,
        lifecycle: &Lifecycle,
    ) -> PipelineResult<RunSummary>
    where
        W: DistanceWriter + ?Sized + 'static,
    {
        let result = self.run_stages(table, writer, lifecycle).await;
        if result.is_err() {
            lifecycle.abort();
        }
        result
    }

    async fn run_stages<W>(
        &self,
        table: Arc<PointTable>,
        writer: Arc<W>,
        lifecycle: &Lifecycle,
    ) -> PipelineResult<RunSummary>
    where
        W: DistanceWriter + ?Sized + 'static,
    {
        validate_config(self.config.as_ref())?;

        let start_time = Instant::now();
        let config = self.config.as_ref();
        let worker_count = config.worker_count();
        let pair_mode = config.pair_mode();
        let expected_rows = pair_mode.expected_rows(table.len());

        // WorkQueueは既定で地点数分の容量（配信がブロックしない）
        let queue_capacity = config.work_queue_capacity().unwrap_or(table.len()).max(1);
        let (work_tx, work_rx) = mpsc::channel::<WorkItem>(queue_capacity);
        let (result_tx, result_rx) = mpsc::channel::<DistanceResult>(config.result_buffer_size());

        let reporting = config.enable_progress_reporting();
        if reporting {
            self.reporter.report_started(table.len(), worker_count).await;
        }

        lifecycle.advance(PipelineState::Dispatching)?;

        // ResultSink起動
        let sink_handle = spawn_result_sink(
            result_rx,
            writer,
            reporting.then(|| Arc::clone(&self.reporter)),
            config.batch_size(),
            expected_rows,
        );

        // Worker Pool起動
        let worker_handles = spawn_workers(
            Arc::clone(&table),
            work_rx,
            result_tx.clone(),
            worker_count,
            config.distance_unit(),
            pair_mode,
        );

        // 全地点を配信し、完了後にWorkQueueを閉じる
        let dispatched = spawn_dispatcher(Arc::clone(&table), work_tx).await??;

        lifecycle.advance(PipelineState::Draining)?;

        // 全ワーカーの完了を待つ
        let mut reports: Vec<WorkerReport> = Vec::with_capacity(worker_count);
        for handle in worker_handles {
            reports.push(handle.await??);
        }

        lifecycle.advance(PipelineState::Flushing)?;

        // 全ワーカー終了後に結果チャンネルを閉じてSinkに完了を通知
        drop(result_tx);
        let sink_report = sink_handle.await??;

        let sources_processed: usize = reports.iter().map(|r| r.sources_processed).sum();
        if sources_processed != dispatched {
            return Err(DistanceError::channel(format!(
                "処理された起点数が配信数と一致しません: {sources_processed}/{dispatched}"
            )));
        }

        lifecycle.advance(PipelineState::Done)?;

        let summary = RunSummary {
            point_count: table.len(),
            worker_count,
            pairs_computed: reports.iter().map(|r| r.pairs_computed).sum(),
            rows_written: sink_report.rows_written,
            self_pairs_dropped: sink_report.self_pairs_dropped,
            batches_flushed: sink_report.batches_flushed,
            elapsed_ms: start_time.elapsed().as_millis() as u64,
        };

        if reporting {
            self.reporter.report_completed(&summary).await;
        }

        Ok(summary)
    }
}
