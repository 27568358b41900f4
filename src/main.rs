use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use plyfeat_core::StandardChess;
use plyfeat_pipeline::{PgnFile, PipelineConfig, Scheduler, write_csv_file};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Replay PGN games in parallel and write one CSV row of features per ply.
#[derive(Debug, Parser)]
#[command(name = "plyfeat", version)]
struct Cli {
    /// PGN file to read games from.
    #[arg(long)]
    pgn: PathBuf,

    /// Number of games to process, split evenly across workers.
    #[arg(long, default_value_t = 20_000)]
    games: u64,

    /// Number of worker threads.
    #[arg(long, default_value_t = 8)]
    workers: usize,

    /// Destination CSV file.
    #[arg(long, default_value = "features.csv")]
    output: PathBuf,

    /// Malformed games a single worker may skip before the run fails.
    #[arg(long)]
    max_malformed: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    info!(pgn = %cli.pgn.display(), games = cli.games, workers = cli.workers, "plyfeat starting");

    let mut config =
        PipelineConfig::new(cli.games, cli.workers).context("invalid pipeline configuration")?;
    if let Some(tolerance) = cli.max_malformed {
        config = config.with_malformed_tolerance(tolerance);
    }

    let scheduler = Scheduler::new(config, StandardChess, PgnFile::new(&cli.pgn));
    let dataset = match scheduler.run() {
        Ok(dataset) => dataset,
        Err(err) => {
            if let Some(stats) = err.stats() {
                error!(%stats, "run aborted");
            }
            return Err(err)
                .with_context(|| format!("failed to extract features from {}", cli.pgn.display()));
        }
    };

    write_csv_file(&cli.output, &dataset.records)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;
    info!(
        positions = dataset.records.len(),
        output = %cli.output.display(),
        stats = %dataset.stats,
        "done"
    );
    Ok(())
}
