// DistanceEngine - 依存性注入による距離計算エンジン
// 入力の読み込みから出力の完了までのライフサイクル全体を管理する

use super::{lifecycle::Lifecycle, pipeline::DistancePipeline};
use crate::{
    core::{
        DistanceWriter, PipelineConfig, PipelineResult, PipelineState, PointTable,
        ProgressReporter, RunSummary,
    },
    services::{config::validate_config, input::load_point_table, persistence::CsvDistanceWriter},
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// 距離計算エンジン
///
/// 設定と進捗報告はコンストラクタで注入される。入出力先は実行ごとに渡す。
/// 最後の実行がどの状態で終わったかは`state()`で確認できる。
pub struct DistanceEngine<C, R> {
    config: Arc<C>,
    reporter: Arc<R>,
    lifecycle: Lifecycle,
}

impl<C, R> DistanceEngine<C, R>
where
    C: PipelineConfig,
    R: ProgressReporter + 'static,
{
    pub fn new(config: C, reporter: R) -> Self {
        Self {
            config: Arc::new(config),
            reporter: Arc::new(reporter),
            lifecycle: Lifecycle::new(),
        }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// 最後の実行の状態
    pub fn state(&self) -> PipelineState {
        self.lifecycle.state()
    }

    /// 入力CSVを読み込み、全ペアの距離を出力CSVへ書き込む
    pub async fn run(&self, input: &Path, output: &Path) -> PipelineResult<RunSummary> {
        self.lifecycle.reset();
        let result = self.load_and_execute(input, output).await;
        if result.is_err() {
            self.lifecycle.abort();
        }
        result
    }

    /// 読み込み済みのテーブルを任意の出力先へ書き込む
    pub async fn run_table<W>(
        &self,
        table: PointTable,
        writer: Arc<W>,
    ) -> PipelineResult<RunSummary>
    where
        W: DistanceWriter + ?Sized + 'static,
    {
        self.lifecycle.reset();
        if let Err(error) = self.lifecycle.advance(PipelineState::Loading) {
            self.lifecycle.abort();
            return Err(error);
        }
        self.pipeline()
            .execute(Arc::new(table), writer, &self.lifecycle)
            .await
    }

    async fn load_and_execute(&self, input: &Path, output: &Path) -> PipelineResult<RunSummary> {
        validate_config(self.config.as_ref())?;
        self.lifecycle.advance(PipelineState::Loading)?;

        // CSVの読み込みはブロッキングI/O
        let input_path: PathBuf = input.to_path_buf();
        let table = tokio::task::spawn_blocking(move || load_point_table(&input_path)).await??;
        log::info!("{} 地点を読み込みました: {}", table.len(), input.display());

        let writer = Arc::new(CsvDistanceWriter::create(output).await?);

        self.pipeline()
            .execute(Arc::new(table), writer, &self.lifecycle)
            .await
    }

    fn pipeline(&self) -> DistancePipeline<C, R> {
        DistancePipeline::new(Arc::clone(&self.config), Arc::clone(&self.reporter))
    }
}
