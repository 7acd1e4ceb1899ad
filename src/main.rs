use env_logger::{Env, Target};
use pair_distance::cli::{execute_run, Cli, ParsedArgs, USAGE};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Stderr)
        .init();

    let cli = match Cli::parse_or_usage(std::env::args_os()) {
        Ok(ParsedArgs::Run(cli)) => cli,
        Ok(ParsedArgs::Usage) => {
            println!("{USAGE}");
            return;
        }
        // --help / --version / 不正なオプション値
        Err(error) => error.exit(),
    };

    match execute_run(cli).await {
        Ok(summary) => {
            log::info!(
                "完了: {} 地点, {} 行, {} バッチ, {} ms",
                summary.point_count,
                summary.rows_written,
                summary.batches_flushed,
                summary.elapsed_ms
            );
        }
        Err(error) => {
            log::error!("{} failed: {error}", error.operation());
            std::process::exit(1);
        }
    }
}
