//! Pipeline errors.

use crate::stats::RunStats;

/// Invalid [`PipelineConfig`](crate::PipelineConfig) values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// At least one worker is required.
    #[error("worker count must be at least 1")]
    NoWorkers,
}

/// Why a single worker stopped before reaching the end of its slice.
#[derive(Debug, thiserror::Error)]
pub enum WorkerFailure {
    /// The record source could not be opened or read.
    #[error("record source unreadable: {source}")]
    Unreadable {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// More games were skipped as malformed than the configured tolerance.
    #[error("{skipped} malformed games exceed the tolerance of {tolerance}")]
    TooManyMalformed {
        /// Games skipped so far.
        skipped: u64,
        /// Configured tolerance.
        tolerance: u64,
    },
}

/// Errors surfaced by a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A worker failed; the run is aborted and no output is produced.
    #[error("worker {worker} failed: {cause}")]
    PartialFailure {
        /// Index of the first failing partition.
        worker: usize,
        /// What went wrong in that worker.
        cause: WorkerFailure,
        /// Counters accumulated by all workers up to the failure.
        stats: RunStats,
    },

    /// Writing the merged table failed.
    #[error("failed to write output: {source}")]
    Output {
        /// The underlying CSV error.
        #[from]
        source: csv::Error,
    },
}

impl PipelineError {
    /// Run counters, when the failure happened after workers ran.
    pub fn stats(&self) -> Option<&RunStats> {
        match self {
            PipelineError::PartialFailure { stats, .. } => Some(stats),
            _ => None,
        }
    }
}
