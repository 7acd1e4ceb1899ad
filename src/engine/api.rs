// 高レベルAPI - よく使う構成のエンジンを作成する便利関数

use super::distance_engine::DistanceEngine;
use crate::{
    core::{PipelineResult, RunSummary},
    services::{ConsoleProgressReporter, DefaultPipelineConfig, NoOpProgressReporter},
};
use std::path::Path;

/// デフォルト設定・コンソール進捗報告のエンジンを作成
pub fn create_default_engine() -> DistanceEngine<DefaultPipelineConfig, ConsoleProgressReporter> {
    DistanceEngine::new(DefaultPipelineConfig::default(), ConsoleProgressReporter::new())
}

/// 進捗報告なしのエンジンを作成（テスト・組み込み用）
pub fn create_quiet_engine(
    config: DefaultPipelineConfig,
) -> DistanceEngine<DefaultPipelineConfig, NoOpProgressReporter> {
    DistanceEngine::new(
        config.with_progress_reporting(false),
        NoOpProgressReporter::new(),
    )
}

/// 入力CSVから出力CSVまでをデフォルト設定で実行
pub async fn compute_distance_file(input: &Path, output: &Path) -> PipelineResult<RunSummary> {
    create_default_engine().run(input, output).await
}
