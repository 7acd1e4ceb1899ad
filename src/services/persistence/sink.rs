// ResultSink - 結果の収集とバッチ書き込み

use crate::core::{
    DistanceError, DistanceResult, DistanceRow, DistanceWriter, PipelineResult, ProgressReporter,
    SinkReport,
};
use std::sync::Arc;
use tokio::sync::mpsc;

/// ResultSink: 結果チャンネルの唯一の受信者
///
/// 自己ペアを除外し、`batch_size`行ごとに1回書き込む。チャンネル終了後は
/// 残りの行を書き込んでから出力先を完了させる。書き込み失敗は即座にエラーで終了し、
/// 未書き込みの行は破棄される。`reporter`が`None`なら進捗は報告しない。
pub fn spawn_result_sink<W, R>(
    mut result_rx: mpsc::Receiver<DistanceResult>,
    writer: Arc<W>,
    reporter: Option<Arc<R>>,
    batch_size: usize,
    expected_rows: usize,
) -> tokio::task::JoinHandle<PipelineResult<SinkReport>>
where
    W: DistanceWriter + ?Sized + 'static,
    R: ProgressReporter + ?Sized + 'static,
{
    tokio::spawn(async move {
        let batch_size = batch_size.max(1);
        let mut batch: Vec<DistanceRow> = Vec::with_capacity(batch_size);
        let mut report = SinkReport::default();

        while let Some(result) = result_rx.recv().await {
            if result.is_self_pair() {
                report.self_pairs_dropped += 1;
                continue;
            }

            batch.push(DistanceRow::from(&result));
            if batch.len() >= batch_size {
                flush_batch(writer.as_ref(), &mut batch, &mut report).await?;
                report_progress(reporter.as_deref(), &report, expected_rows).await;
            }
        }

        // 残りバッチの書き込み
        if !batch.is_empty() {
            flush_batch(writer.as_ref(), &mut batch, &mut report).await?;
            report_progress(reporter.as_deref(), &report, expected_rows).await;
        }

        writer
            .finalize()
            .await
            .map_err(|e| DistanceError::output_write(writer.target(), e))?;

        log::debug!(
            "ResultSink完了: {}行 / {}バッチ",
            report.rows_written,
            report.batches_flushed
        );
        Ok(report)
    })
}

async fn report_progress<R>(reporter: Option<&R>, report: &SinkReport, expected_rows: usize)
where
    R: ProgressReporter + ?Sized,
{
    if let Some(reporter) = reporter {
        reporter
            .report_progress(report.rows_written, expected_rows)
            .await;
    }
}

async fn flush_batch<W>(
    writer: &W,
    batch: &mut Vec<DistanceRow>,
    report: &mut SinkReport,
) -> PipelineResult<()>
where
    W: DistanceWriter + ?Sized,
{
    writer
        .write_batch(batch.as_slice())
        .await
        .map_err(|e| DistanceError::output_write(writer.target(), e))?;

    report.rows_written += batch.len();
    report.batches_flushed += 1;
    batch.clear();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::{MockDistanceWriter, MockProgressReporter};
    use crate::services::monitoring::NoOpProgressReporter;
    use crate::services::persistence::MemoryDistanceWriter;

    fn result(source: &str, dest: &str, distance: f64) -> DistanceResult {
        DistanceResult {
            source_label: source.into(),
            dest_label: dest.into(),
            distance,
        }
    }

    #[tokio::test]
    async fn test_sink_filters_self_pairs() {
        let (result_tx, result_rx) = mpsc::channel::<DistanceResult>(10);
        let writer = MemoryDistanceWriter::new();

        let handle = spawn_result_sink(
            result_rx,
            Arc::new(writer.clone()),
            Some(Arc::new(NoOpProgressReporter::new())),
            2000,
            2,
        );

        result_tx.send(result("A", "A", 0.0)).await.unwrap();
        result_tx.send(result("A", "B", 69.0930)).await.unwrap();
        result_tx.send(result("B", "A", 69.0930)).await.unwrap();
        result_tx.send(result("B", "B", 0.0)).await.unwrap();
        drop(result_tx);

        let report = handle.await.unwrap().unwrap();

        assert_eq!(report.rows_written, 2);
        assert_eq!(report.self_pairs_dropped, 2);
        assert_eq!(report.batches_flushed, 1);
        assert!(writer.is_finalized());

        let rows = writer.rows();
        assert!(rows.iter().all(|r| r.source != r.destination));
        assert_eq!(rows[0].distance, "69.093");
    }

    #[tokio::test]
    async fn test_sink_flushes_at_batch_boundary() {
        let (result_tx, result_rx) = mpsc::channel::<DistanceResult>(10);
        let writer = MemoryDistanceWriter::new();

        let handle = spawn_result_sink(
            result_rx,
            Arc::new(writer.clone()),
            Some(Arc::new(NoOpProgressReporter::new())),
            2,
            5,
        );

        // 5行 → 2+2+1のバッチ
        for i in 0..5 {
            result_tx
                .send(result("S", &format!("D{i}"), i as f64))
                .await
                .unwrap();
        }
        drop(result_tx);

        let report = handle.await.unwrap().unwrap();

        assert_eq!(report.batches_flushed, 3);
        assert_eq!(writer.batch_sizes(), vec![2, 2, 1]);
    }

    #[tokio::test]
    async fn test_sink_reports_progress_per_flush() {
        let (result_tx, result_rx) = mpsc::channel::<DistanceResult>(10);
        let writer = MemoryDistanceWriter::new();

        let mut reporter = MockProgressReporter::new();
        reporter
            .expect_report_progress()
            .withf(|_, expected| *expected == 5)
            .times(3)
            .return_const(());

        let handle = spawn_result_sink(
            result_rx,
            Arc::new(writer.clone()),
            Some(Arc::new(reporter)),
            2,
            5,
        );

        for i in 0..5 {
            result_tx
                .send(result("S", &format!("D{i}"), 1.0))
                .await
                .unwrap();
        }
        drop(result_tx);

        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_sink_without_reporter() {
        let (result_tx, result_rx) = mpsc::channel::<DistanceResult>(10);
        let writer = MemoryDistanceWriter::new();

        let handle = spawn_result_sink(
            result_rx,
            Arc::new(writer.clone()),
            None::<Arc<MockProgressReporter>>,
            1,
            2,
        );

        result_tx.send(result("A", "B", 1.0)).await.unwrap();
        result_tx.send(result("B", "A", 1.0)).await.unwrap();
        drop(result_tx);

        let report = handle.await.unwrap().unwrap();
        assert_eq!(report.rows_written, 2);
        assert_eq!(writer.batch_count(), 2);
    }

    #[tokio::test]
    async fn test_sink_exact_multiple_has_no_extra_flush() {
        let (result_tx, result_rx) = mpsc::channel::<DistanceResult>(10);
        let writer = MemoryDistanceWriter::new();

        let handle = spawn_result_sink(
            result_rx,
            Arc::new(writer.clone()),
            Some(Arc::new(NoOpProgressReporter::new())),
            3,
            6,
        );

        for i in 0..6 {
            result_tx
                .send(result("S", &format!("D{i}"), 1.0))
                .await
                .unwrap();
        }
        drop(result_tx);

        let report = handle.await.unwrap().unwrap();

        assert_eq!(report.batches_flushed, 2);
        assert_eq!(writer.batch_sizes(), vec![3, 3]);
    }

    #[tokio::test]
    async fn test_sink_with_no_rows_does_not_flush() {
        let (result_tx, result_rx) = mpsc::channel::<DistanceResult>(10);
        let writer = MemoryDistanceWriter::new();

        let handle = spawn_result_sink(
            result_rx,
            Arc::new(writer.clone()),
            Some(Arc::new(NoOpProgressReporter::new())),
            2000,
            0,
        );

        result_tx.send(result("A", "A", 0.0)).await.unwrap();
        drop(result_tx);

        let report = handle.await.unwrap().unwrap();

        assert_eq!(report.rows_written, 0);
        assert_eq!(report.batches_flushed, 0);
        assert_eq!(writer.batch_count(), 0);
        assert!(writer.is_finalized());
    }

    #[tokio::test]
    async fn test_sink_write_failure_is_fatal() {
        let (result_tx, result_rx) = mpsc::channel::<DistanceResult>(10);

        let mut writer = MockDistanceWriter::new();
        writer
            .expect_write_batch()
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("ディスクがいっぱいです")));
        writer.expect_finalize().never();
        writer
            .expect_target()
            .returning(|| "/out/distances.csv".to_string());

        let handle = spawn_result_sink(
            result_rx,
            Arc::new(writer),
            Some(Arc::new(NoOpProgressReporter::new())),
            1,
            3,
        );

        result_tx.send(result("A", "B", 1.0)).await.unwrap();
        // Sinkが終了すると以降の送信は失敗する
        let _ = result_tx.send(result("B", "A", 1.0)).await;
        drop(result_tx);

        let error = handle.await.unwrap().unwrap_err();
        assert!(matches!(error, DistanceError::OutputWrite { .. }));
        assert_eq!(error.resource(), Some("/out/distances.csv"));
        assert!(error.to_string().contains("ディスクがいっぱいです"));
    }

    #[tokio::test]
    async fn test_sink_finalize_failure_is_fatal() {
        let (result_tx, result_rx) = mpsc::channel::<DistanceResult>(10);

        let mut writer = MockDistanceWriter::new();
        writer.expect_write_batch().returning(|_| Ok(()));
        writer
            .expect_finalize()
            .times(1)
            .returning(|| Err(anyhow::anyhow!("close failed")));
        writer.expect_target().returning(|| "mock".to_string());

        let handle = spawn_result_sink(
            result_rx,
            Arc::new(writer),
            Some(Arc::new(NoOpProgressReporter::new())),
            10,
            1,
        );

        result_tx.send(result("A", "B", 1.0)).await.unwrap();
        drop(result_tx);

        let error = handle.await.unwrap().unwrap_err();
        assert_eq!(error.operation(), "write_output");
    }
}
