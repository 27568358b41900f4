//! Slicing the game sequence among workers.

/// A contiguous slice of the game sequence owned by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    pub worker_id: usize,
    /// Records to skip before this slice begins.
    pub start_offset: u64,
    /// Records in the slice.
    pub count: u64,
}

/// Split `total_games` into `workers` equal slices of `total_games / workers`.
///
/// The remainder `total_games % workers` is not assigned to anyone: those
/// trailing games are dropped. Returns no partitions for zero workers.
pub fn plan(total_games: u64, workers: usize) -> Vec<Partition> {
    let Some(chunk) = total_games.checked_div(workers as u64) else {
        return Vec::new();
    };
    (0..workers)
        .map(|worker_id| Partition {
            worker_id,
            start_offset: worker_id as u64 * chunk,
            count: chunk,
        })
        .collect()
}
