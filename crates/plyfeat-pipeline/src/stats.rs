//! Run counters.

use std::fmt;
use std::ops::AddAssign;

/// Counters reported at the end of every run, successful or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunStats {
    /// Records decoded (or found malformed) inside a worker's slice.
    pub games_attempted: u64,
    /// Games whose every move replayed legally.
    pub games_replayed: u64,
    /// Games dropped as malformed or illegal, in whole or in part.
    pub games_skipped: u64,
    pub positions_emitted: u64,
}

impl AddAssign for RunStats {
    fn add_assign(&mut self, rhs: RunStats) {
        self.games_attempted += rhs.games_attempted;
        self.games_replayed += rhs.games_replayed;
        self.games_skipped += rhs.games_skipped;
        self.positions_emitted += rhs.positions_emitted;
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "games attempted {}, replayed {}, skipped {}, positions {}",
            self.games_attempted, self.games_replayed, self.games_skipped, self.positions_emitted
        )
    }
}
