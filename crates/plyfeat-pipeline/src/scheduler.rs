//! Scheduler / merger: plans partitions, runs one worker per partition on
//! its own thread, and concatenates their rows in partition order.

use tracing::{debug, info};

use plyfeat_core::{FeatureRecord, RulesOracle};

use crate::config::PipelineConfig;
use crate::control::PipelineControl;
use crate::error::PipelineError;
use crate::partition::{Partition, plan};
use crate::source::RecordSource;
use crate::stats::RunStats;
use crate::worker::{Worker, WorkerOutput, WorkerState};

/// The merged result of a run.
#[derive(Debug)]
pub struct Dataset {
    /// Rows in partition order, then game order, then ply order.
    pub records: Vec<FeatureRecord>,
    pub stats: RunStats,
    /// Terminal state of each partition, in partition order.
    pub outcomes: Vec<(Partition, WorkerState)>,
}

impl Dataset {
    /// `true` if any worker stopped because of cancellation.
    pub fn was_cancelled(&self) -> bool {
        self.outcomes
            .iter()
            .any(|(_, state)| *state == WorkerState::Cancelled)
    }
}

/// Runs the pipeline over one record source.
pub struct Scheduler<O, S> {
    config: PipelineConfig,
    oracle: O,
    source: S,
    control: PipelineControl,
}

impl<O: RulesOracle, S: RecordSource> Scheduler<O, S> {
    pub fn new(config: PipelineConfig, oracle: O, source: S) -> Self {
        Self {
            config,
            oracle,
            source,
            control: PipelineControl::new(),
        }
    }

    /// The cancellation handle; clone it to cancel from another thread.
    pub fn control(&self) -> &PipelineControl {
        &self.control
    }

    /// Run every partition to a terminal state and merge the results.
    ///
    /// Fails with [`PipelineError::PartialFailure`] if any worker failed;
    /// the error still carries the combined counters of all workers.
    pub fn run(&self) -> Result<Dataset, PipelineError> {
        let partitions = plan(self.config.total_games(), self.config.workers());
        let chunk = partitions.first().map_or(0, |p| p.count);
        info!(
            workers = partitions.len(),
            chunk,
            dropped = self.config.total_games() - chunk * partitions.len() as u64,
            "planned partitions"
        );

        let outputs = if partitions.len() <= 1 {
            // Single worker: run inline without spawning
            partitions.iter().map(|p| self.run_partition(*p)).collect()
        } else {
            self.run_parallel(&partitions)
        };

        self.merge(outputs)
    }

    fn run_partition(&self, partition: Partition) -> WorkerOutput {
        Worker::new(
            partition,
            &self.oracle,
            &self.control,
            self.config.malformed_tolerance(),
        )
        .run(&self.source)
    }

    /// One scoped thread per partition; outputs come back in partition order
    /// regardless of which thread finishes first.
    fn run_parallel(&self, partitions: &[Partition]) -> Vec<WorkerOutput> {
        std::thread::scope(|s| {
            let handles: Vec<_> = partitions
                .iter()
                .map(|&partition| s.spawn(move || self.run_partition(partition)))
                .collect();

            handles
                .into_iter()
                .map(|handle| match handle.join() {
                    Ok(output) => output,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect()
        })
    }

    fn merge(&self, outputs: Vec<WorkerOutput>) -> Result<Dataset, PipelineError> {
        let mut stats = RunStats::default();
        for output in &outputs {
            stats += output.stats;
        }

        let total_rows = outputs.iter().map(|o| o.records.len()).sum();
        let mut records = Vec::with_capacity(total_rows);
        let mut outcomes = Vec::with_capacity(outputs.len());
        for output in outputs {
            if let Some(cause) = output.failure {
                info!(%stats, "run aborted");
                return Err(PipelineError::PartialFailure {
                    worker: output.partition.worker_id,
                    cause,
                    stats,
                });
            }
            debug!(
                worker = output.partition.worker_id,
                state = ?output.state,
                rows = output.records.len(),
                "merging worker output"
            );
            records.extend(output.records);
            outcomes.push((output.partition, output.state));
        }

        info!(%stats, "run complete");
        Ok(Dataset {
            records,
            stats,
            outcomes,
        })
    }
}
