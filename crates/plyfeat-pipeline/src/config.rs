//! Pipeline configuration.

use crate::error::ConfigError;

/// Everything a [`Scheduler`](crate::Scheduler) needs to plan a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    total_games: u64,
    workers: usize,
    malformed_tolerance: Option<u64>,
}

impl PipelineConfig {
    /// Validate and build a configuration. Malformed games are tolerated
    /// without limit until [`with_malformed_tolerance`](Self::with_malformed_tolerance)
    /// says otherwise.
    pub fn new(total_games: u64, workers: usize) -> Result<Self, ConfigError> {
        if workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        Ok(Self {
            total_games,
            workers,
            malformed_tolerance: None,
        })
    }

    /// Fail a worker once it has skipped more than `tolerance` malformed games.
    pub fn with_malformed_tolerance(mut self, tolerance: u64) -> Self {
        self.malformed_tolerance = Some(tolerance);
        self
    }

    pub fn total_games(&self) -> u64 {
        self.total_games
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn malformed_tolerance(&self) -> Option<u64> {
        self.malformed_tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_workers_rejected() {
        assert_eq!(PipelineConfig::new(100, 0), Err(ConfigError::NoWorkers));
    }

    #[test]
    fn tolerance_defaults_to_unlimited() {
        let config = PipelineConfig::new(100, 8).unwrap();
        assert_eq!(config.total_games(), 100);
        assert_eq!(config.workers(), 8);
        assert_eq!(config.malformed_tolerance(), None);
        assert_eq!(config.with_malformed_tolerance(5).malformed_tolerance(), Some(5));
    }
}
