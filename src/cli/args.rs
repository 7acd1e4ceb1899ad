use crate::core::{DistanceUnit, PairMode};
use crate::services::config::{
    DefaultPipelineConfig, DEFAULT_BATCH_SIZE, DEFAULT_WORKER_MULTIPLIER,
};
use clap::error::ErrorKind;
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

/// 引数の個数が正しくない場合に表示する使い方
pub const USAGE: &str = "distance <zipcodes.csv> <distances.csv>";

#[derive(Parser, Debug)]
#[command(name = "distance")]
#[command(about = "Compute great-circle distances between every pair of points in a CSV table")]
#[command(version)]
pub struct Cli {
    /// Input CSV with a header row and `label,latitude,longitude` columns
    pub input: PathBuf,

    /// Output CSV receiving `source,destination,distance` rows
    pub output: PathBuf,

    /// Exact number of workers (overrides --worker-multiplier)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Workers per available CPU
    #[arg(long, default_value_t = DEFAULT_WORKER_MULTIPLIER)]
    pub worker_multiplier: usize,

    /// Rows buffered per write to the output file
    #[arg(short, long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Work queue capacity (defaults to the number of points)
    #[arg(long)]
    pub queue_capacity: Option<usize>,

    /// Distance unit
    #[arg(short, long, value_enum, default_value_t = DistanceUnit::Miles)]
    pub unit: DistanceUnit,

    /// Emit both (A,B) and (B,A), or only one row per unordered pair
    #[arg(long, value_enum, default_value_t = PairMode::Full)]
    pub pairs: PairMode,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}

/// 引数解析の結果
#[derive(Debug)]
pub enum ParsedArgs {
    Run(Cli),
    /// 位置引数の個数が正しくない（使い方を表示して正常終了する）
    Usage,
}

impl Cli {
    /// 引数を解析する
    ///
    /// 位置引数の過不足は`ParsedArgs::Usage`になる。`--help`/`--version`や
    /// 不正なオプション値はclapのエラーとして返す。
    pub fn parse_or_usage<I, T>(args: I) -> Result<ParsedArgs, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        match Self::try_parse_from(args) {
            Ok(cli) => Ok(ParsedArgs::Run(cli)),
            Err(error) => match error.kind() {
                ErrorKind::MissingRequiredArgument
                | ErrorKind::UnknownArgument
                | ErrorKind::TooManyValues
                | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => Ok(ParsedArgs::Usage),
                _ => Err(error),
            },
        }
    }

    /// 引数からパイプライン設定を組み立てる
    pub fn to_config(&self) -> DefaultPipelineConfig {
        let config = DefaultPipelineConfig::default()
            .with_batch_size(self.batch_size)
            .with_distance_unit(self.unit)
            .with_pair_mode(self.pairs)
            .with_progress_reporting(!self.quiet);

        let config = match self.workers {
            Some(workers) => config.with_worker_count(workers),
            None => config.with_worker_multiplier(self.worker_multiplier),
        };

        match self.queue_capacity {
            Some(capacity) => config.with_queue_capacity(capacity),
            None => config,
        }
    }
}
