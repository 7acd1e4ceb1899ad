// パイプラインの抽象化インターフェース定義

use super::types::{DistanceRow, DistanceUnit, PairMode, RunSummary};
use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

/// パイプライン設定を抽象化するトレイト
#[automock]
pub trait PipelineConfig: Send + Sync {
    /// ワーカー数を取得
    fn worker_count(&self) -> usize;

    /// WorkQueueの容量（Noneの場合は地点数）
    fn work_queue_capacity(&self) -> Option<usize>;

    /// 結果チャンネルのバッファサイズを取得
    fn result_buffer_size(&self) -> usize;

    /// 1回の書き込みにまとめる行数を取得
    fn batch_size(&self) -> usize;

    /// 出力するペアの範囲
    fn pair_mode(&self) -> PairMode;

    /// 距離の単位
    fn distance_unit(&self) -> DistanceUnit;

    /// 進捗報告を有効にするかどうか
    fn enable_progress_reporting(&self) -> bool;
}

/// 進捗報告の抽象化トレイト
#[automock]
#[async_trait]
pub trait ProgressReporter: Send + Sync {
    /// 処理開始時の報告
    async fn report_started(&self, point_count: usize, worker_count: usize);

    /// バッチ書き込みごとの報告
    async fn report_progress(&self, rows_written: usize, expected_rows: usize);

    /// 処理完了時の報告
    async fn report_completed(&self, summary: &RunSummary);
}

// ProgressReporter for Box<dyn ProgressReporter>
#[async_trait]
impl ProgressReporter for Box<dyn ProgressReporter> {
    async fn report_started(&self, point_count: usize, worker_count: usize) {
        self.as_ref().report_started(point_count, worker_count).await
    }

    async fn report_progress(&self, rows_written: usize, expected_rows: usize) {
        self.as_ref()
            .report_progress(rows_written, expected_rows)
            .await
    }

    async fn report_completed(&self, summary: &RunSummary) {
        self.as_ref().report_completed(summary).await
    }
}

/// 出力先の抽象化トレイト
///
/// `write_batch`の1回の呼び出しが1回の書き込み操作に対応する。
#[automock]
#[async_trait]
pub trait DistanceWriter: Send + Sync {
    /// バッチの書き込み
    async fn write_batch(&self, rows: &[DistanceRow]) -> Result<()>;

    /// 書き込み完了処理（出力リソースの解放）
    async fn finalize(&self) -> Result<()>;

    /// 診断用の出力先名
    fn target(&self) -> String;
}
