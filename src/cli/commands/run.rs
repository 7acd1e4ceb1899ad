use crate::cli::Cli;
use crate::core::{PipelineResult, ProgressReporter, RunSummary};
use crate::engine::DistanceEngine;
use crate::services::{ConsoleProgressReporter, NoOpProgressReporter};

/// 入力CSVの全ペア距離を計算して出力CSVへ書き込む
pub async fn execute_run(cli: Cli) -> PipelineResult<RunSummary> {
    let reporter: Box<dyn ProgressReporter> = if cli.quiet {
        Box::new(NoOpProgressReporter::new())
    } else {
        Box::new(ConsoleProgressReporter::new())
    };

    let engine = DistanceEngine::new(cli.to_config(), reporter);

    log::debug!(
        "ワーカー数: {}, バッチサイズ: {}",
        cli.workers.map_or_else(|| "auto".to_string(), |n| n.to_string()),
        cli.batch_size
    );

    engine.run(&cli.input, &cli.output).await
}
