//! Parallel PGN-to-feature pipeline: partitioning, workers, and merging.

pub mod config;
pub mod control;
pub mod error;
pub mod output;
pub mod partition;
pub mod scheduler;
pub mod source;
pub mod stats;
pub mod worker;

pub use config::PipelineConfig;
pub use control::PipelineControl;
pub use error::{ConfigError, PipelineError, WorkerFailure};
pub use output::{write_csv, write_csv_file};
pub use partition::{Partition, plan};
pub use scheduler::{Dataset, Scheduler};
pub use source::{InMemory, PgnFile, RecordSource};
pub use stats::RunStats;
pub use worker::{Worker, WorkerOutput, WorkerState};
