//! Run control: the shared cancellation flag.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cancellation handle shared by the scheduler and its workers.
///
/// Workers poll it between records, never in the middle of one: a cancelled
/// worker finishes the game it is replaying and then reports what it has.
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct PipelineControl {
    stopped: Arc<AtomicBool>,
}

impl PipelineControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask all workers to stop at their next record boundary.
    pub fn cancel(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}
