//! Partitioned worker: skips to its slice, replays each game, and extracts
//! one feature row per ply.

use std::io::BufRead;

use tracing::{debug, info, warn};

use plyfeat_core::{CastleFlags, FeatureRecord, Game, OracleError, RulesOracle, extract};
use plyfeat_pgn::{DecodeError, PgnDecoder};

use crate::control::PipelineControl;
use crate::error::WorkerFailure;
use crate::partition::Partition;
use crate::source::RecordSource;
use crate::stats::RunStats;

/// Log a progress line every this many processed games.
const PROGRESS_INTERVAL: u64 = 1000;

/// Lifecycle of a worker.
///
/// `Skipping` and `Processing` are transient; every run ends in one of the
/// other states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Discarding records that precede the slice.
    Skipping,
    /// Replaying the records of the slice.
    Processing,
    /// Every record of the slice was consumed.
    Done,
    /// The stream ended before the slice did. Not an error.
    Exhausted,
    /// Stopped at a record boundary on request.
    Cancelled,
    /// Stopped by an unreadable source or too many malformed games.
    Failed,
}

impl WorkerState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, WorkerState::Skipping | WorkerState::Processing)
    }
}

/// What a worker hands back to the scheduler.
#[derive(Debug)]
pub struct WorkerOutput {
    pub partition: Partition,
    pub state: WorkerState,
    /// Rows in game order, then ply order.
    pub records: Vec<FeatureRecord>,
    pub stats: RunStats,
    /// Set exactly when `state` is [`WorkerState::Failed`].
    pub failure: Option<WorkerFailure>,
}

/// Processes one [`Partition`] of the record stream.
pub struct Worker<'a, O: RulesOracle> {
    partition: Partition,
    oracle: &'a O,
    control: &'a PipelineControl,
    malformed_tolerance: Option<u64>,
    state: WorkerState,
    records: Vec<FeatureRecord>,
    stats: RunStats,
    failure: Option<WorkerFailure>,
}

impl<'a, O: RulesOracle> Worker<'a, O> {
    pub fn new(
        partition: Partition,
        oracle: &'a O,
        control: &'a PipelineControl,
        malformed_tolerance: Option<u64>,
    ) -> Self {
        Self {
            partition,
            oracle,
            control,
            malformed_tolerance,
            state: WorkerState::Skipping,
            records: Vec::new(),
            stats: RunStats::default(),
            failure: None,
        }
    }

    /// Open a private reader on `source` and process the partition.
    pub fn run<S: RecordSource + ?Sized>(mut self, source: &S) -> WorkerOutput {
        match source.open() {
            Ok(reader) => self.run_on(&mut PgnDecoder::new(reader)),
            Err(err) => {
                self.fail(err.into());
                self.finish()
            }
        }
    }

    /// Process the partition from an already-open decoder positioned at the
    /// first record of the stream.
    pub fn run_on<R: BufRead>(mut self, decoder: &mut PgnDecoder<R>) -> WorkerOutput {
        let worker = self.partition.worker_id;
        debug!(
            worker,
            start = self.partition.start_offset,
            count = self.partition.count,
            "worker starting"
        );

        if self.skip(decoder) {
            self.state = WorkerState::Processing;
            self.process(decoder);
        }

        info!(
            worker,
            state = ?self.state,
            positions = self.stats.positions_emitted,
            "worker finished"
        );
        self.finish()
    }

    /// Discard the records before the slice. Returns `true` when processing
    /// should begin.
    fn skip<R: BufRead>(&mut self, decoder: &mut PgnDecoder<R>) -> bool {
        for skipped in 0..self.partition.start_offset {
            if self.control.is_cancelled() {
                self.state = WorkerState::Cancelled;
                return false;
            }
            match decoder.decode_next() {
                Ok(Some(_)) => {}
                Ok(None) => {
                    info!(
                        worker = self.partition.worker_id,
                        skipped, "no more games to skip"
                    );
                    self.state = WorkerState::Exhausted;
                    return false;
                }
                Err(DecodeError::Io { source }) => {
                    self.fail(source.into());
                    return false;
                }
                // Belongs to an earlier slice; that worker counts it.
                Err(err) => {
                    debug!(
                        worker = self.partition.worker_id,
                        skipped,
                        error = %err,
                        "malformed record in skipped range"
                    );
                }
            }
        }
        true
    }

    fn process<R: BufRead>(&mut self, decoder: &mut PgnDecoder<R>) {
        let worker = self.partition.worker_id;
        for processed in 0..self.partition.count {
            if self.control.is_cancelled() {
                info!(worker, processed, "cancelled");
                self.state = WorkerState::Cancelled;
                return;
            }

            match decoder.decode_next() {
                Ok(Some(game)) => {
                    self.stats.games_attempted += 1;
                    match self.replay(&game) {
                        Ok(()) => self.stats.games_replayed += 1,
                        Err(err) => {
                            self.stats.games_skipped += 1;
                            warn!(worker, record = decoder.records_read(), error = %err, "skipping game");
                        }
                    }
                }
                Ok(None) => {
                    info!(worker, processed, "no more games to process");
                    self.state = WorkerState::Exhausted;
                    return;
                }
                Err(DecodeError::Io { source }) => {
                    self.fail(source.into());
                    return;
                }
                Err(err) => {
                    self.stats.games_attempted += 1;
                    self.stats.games_skipped += 1;
                    warn!(worker, record = decoder.records_read(), error = %err, "skipping malformed record");
                }
            }

            if let Some(tolerance) = self.malformed_tolerance
                && self.stats.games_skipped > tolerance
            {
                self.fail(WorkerFailure::TooManyMalformed {
                    skipped: self.stats.games_skipped,
                    tolerance,
                });
                return;
            }

            let done = processed + 1;
            if done % PROGRESS_INTERVAL == 0 {
                info!(worker, games = done, positions = self.stats.positions_emitted, "progress");
            }
        }
        self.state = WorkerState::Done;
    }

    /// Replay one game, appending a row after every legal ply.
    ///
    /// On an illegal move the rows of earlier plies are kept and the rest of
    /// the game is abandoned.
    fn replay(&mut self, game: &Game) -> Result<(), OracleError> {
        let oracle = self.oracle;
        let mut state = match &game.start_fen {
            Some(fen) => oracle.state_from_fen(fen)?,
            None => oracle.initial_state(),
        };
        let mut castled = CastleFlags::default();

        for san in &game.moves {
            let (next, meta) = oracle.apply(&state, san)?;
            if meta.is_castle {
                castled.mark(meta.mover);
            }
            state = next;

            let row = extract(&oracle.project(&state), game.ratings, castled, game.result);
            self.records.push(row);
            self.stats.positions_emitted += 1;
        }
        Ok(())
    }

    fn fail(&mut self, failure: WorkerFailure) {
        warn!(worker = self.partition.worker_id, error = %failure, "worker failed");
        self.state = WorkerState::Failed;
        self.failure = Some(failure);
    }

    fn finish(self) -> WorkerOutput {
        debug_assert!(self.state.is_terminal());
        WorkerOutput {
            partition: self.partition,
            state: self.state,
            records: self.records,
            stats: self.stats,
            failure: self.failure,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use plyfeat_core::{BoardProjection, MoveMeta, StandardChess};

    use super::*;
    use crate::source::{InMemory, PgnFile};

    fn pgn_game(result: &str, movetext: &str) -> String {
        format!("[WhiteElo \"1600\"]\n[BlackElo \"1400\"]\n[Result \"{result}\"]\n\n{movetext} {result}\n\n")
    }

    /// Five short games with 1..=5 plies.
    fn five_games() -> InMemory {
        let moves = ["e4", "e5", "Nf3", "Nc6", "Bb5"];
        let mut pgn = String::new();
        for n in 1..=moves.len() {
            pgn.push_str(&pgn_game("1-0", &moves[..n].join(" ")));
        }
        InMemory::new(pgn)
    }

    fn partition(start_offset: u64, count: u64) -> Partition {
        Partition {
            worker_id: 0,
            start_offset,
            count,
        }
    }

    fn run(source: &InMemory, part: Partition, tolerance: Option<u64>) -> WorkerOutput {
        let control = PipelineControl::new();
        Worker::new(part, &StandardChess, &control, tolerance).run(source)
    }

    #[test]
    fn processes_its_slice_after_skipping() {
        let out = run(&five_games(), partition(2, 2), None);
        assert_eq!(out.state, WorkerState::Done);
        assert_eq!(out.stats.games_attempted, 2);
        assert_eq!(out.stats.games_replayed, 2);
        // Games three and four: 3 + 4 plies.
        assert_eq!(out.records.len(), 7);
        assert_eq!(out.stats.positions_emitted, 7);
        assert!(out.failure.is_none());
    }

    #[test]
    fn exhausted_while_skipping_yields_nothing() {
        let out = run(&five_games(), partition(10, 3), None);
        assert_eq!(out.state, WorkerState::Exhausted);
        assert!(out.records.is_empty());
        assert_eq!(out.stats, RunStats::default());
    }

    #[test]
    fn exhausted_while_processing_keeps_partial_output() {
        let out = run(&five_games(), partition(3, 10), None);
        assert_eq!(out.state, WorkerState::Exhausted);
        assert_eq!(out.stats.games_attempted, 2);
        assert_eq!(out.records.len(), 4 + 5);
    }

    #[test]
    fn empty_partition_is_done() {
        let out = run(&five_games(), partition(0, 0), None);
        assert_eq!(out.state, WorkerState::Done);
        assert!(out.records.is_empty());
    }

    #[test]
    fn illegal_move_keeps_earlier_plies() {
        let pgn = pgn_game("0-1", "1. e4 e5 2. Ke3 Nc6") + &pgn_game("0-1", "1. d4");
        let out = run(&InMemory::new(pgn), partition(0, 2), None);
        assert_eq!(out.state, WorkerState::Done);
        assert_eq!(out.stats.games_attempted, 2);
        assert_eq!(out.stats.games_replayed, 1);
        assert_eq!(out.stats.games_skipped, 1);
        assert_eq!(out.records.len(), 2 + 1);
        assert!(out.records.iter().all(|r| r.result == Some(0)));
    }

    #[test]
    fn malformed_record_is_skipped_and_counted() {
        let pgn = format!("[Event \"oops]\n\n1. e4 *\n\n{}", pgn_game("1-0", "1. e4 e5"));
        let out = run(&InMemory::new(pgn), partition(0, 2), None);
        assert_eq!(out.state, WorkerState::Done);
        assert_eq!(out.stats.games_attempted, 2);
        assert_eq!(out.stats.games_skipped, 1);
        assert_eq!(out.stats.games_replayed, 1);
        assert_eq!(out.records.len(), 2);
    }

    #[test]
    fn malformed_records_before_the_slice_are_not_counted() {
        let pgn = format!("[Event \"oops]\n\n1. e4 *\n\n{}", pgn_game("1-0", "1. e4 e5"));
        let out = run(&InMemory::new(pgn), partition(1, 1), None);
        assert_eq!(out.stats.games_skipped, 0);
        assert_eq!(out.records.len(), 2);
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn malformed_records_before_the_slice_are_logged() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let pgn = format!("[Event \"oops]\n\n1. e4 *\n\n{}", pgn_game("1-0", "1. e4 e5"));
        let out = tracing::subscriber::with_default(subscriber, || {
            run(&InMemory::new(pgn), partition(1, 1), None)
        });
        assert_eq!(out.state, WorkerState::Done);

        let text = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(text.contains("malformed record in skipped range"));
        assert!(text.contains("worker=0"));
    }

    #[test]
    fn tolerance_exceeded_fails_the_worker() {
        let bad = pgn_game("1-0", "1. e4 e5 2. e4");
        let pgn = bad.repeat(3);
        let out = run(&InMemory::new(pgn), partition(0, 3), Some(1));
        assert_eq!(out.state, WorkerState::Failed);
        assert_eq!(out.stats.games_skipped, 2);
        assert!(matches!(
            out.failure,
            Some(WorkerFailure::TooManyMalformed {
                skipped: 2,
                tolerance: 1
            })
        ));
    }

    #[test]
    fn unreadable_source_fails_the_worker() {
        let control = PipelineControl::new();
        let source = PgnFile::new("/definitely/not/here.pgn");
        let out = Worker::new(partition(0, 1), &StandardChess, &control, None).run(&source);
        assert_eq!(out.state, WorkerState::Failed);
        assert!(matches!(out.failure, Some(WorkerFailure::Unreadable { .. })));
    }

    #[test]
    fn castle_flags_stay_set_for_the_rest_of_the_game() {
        let pgn = pgn_game("1/2-1/2", "1. e4 e5 2. Nf3 Nc6 3. Bc4 Bc5 4. O-O Nf6 5. d3 O-O 6. h3");
        let out = run(&InMemory::new(pgn), partition(0, 1), None);
        let white: Vec<u8> = out.records.iter().map(|r| r.white_castled).collect();
        let black: Vec<u8> = out.records.iter().map(|r| r.black_castled).collect();
        assert_eq!(white, [0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1]);
        assert_eq!(black, [0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1]);
    }

    #[test]
    fn flags_reset_between_games() {
        let pgn = pgn_game("*", "1. e4 e5 2. Nf3 Nc6 3. Bc4 Bc5 4. O-O") + &pgn_game("*", "1. d4");
        let out = run(&InMemory::new(pgn), partition(0, 2), None);
        assert_eq!(out.records.last().unwrap().white_castled, 0);
        assert_eq!(out.records.last().unwrap().result, None);
    }

    #[test]
    fn cancelled_before_start() {
        let control = PipelineControl::new();
        control.cancel();
        let out = Worker::new(partition(1, 2), &StandardChess, &control, None).run(&five_games());
        assert_eq!(out.state, WorkerState::Cancelled);
        assert!(out.records.is_empty());
    }

    /// Standard rules that request cancellation on the first move it applies.
    struct CancelOnFirstMove {
        control: PipelineControl,
        applied: AtomicUsize,
    }

    impl RulesOracle for CancelOnFirstMove {
        type State = <StandardChess as RulesOracle>::State;

        fn initial_state(&self) -> Self::State {
            StandardChess.initial_state()
        }

        fn state_from_fen(&self, fen: &str) -> Result<Self::State, OracleError> {
            StandardChess.state_from_fen(fen)
        }

        fn apply(&self, state: &Self::State, san: &str) -> Result<(Self::State, MoveMeta), OracleError> {
            self.applied.fetch_add(1, Ordering::Relaxed);
            self.control.cancel();
            StandardChess.apply(state, san)
        }

        fn project(&self, state: &Self::State) -> BoardProjection {
            StandardChess.project(state)
        }
    }

    #[test]
    fn cancellation_takes_effect_at_the_next_record() {
        let control = PipelineControl::new();
        let oracle = CancelOnFirstMove {
            control: control.clone(),
            applied: AtomicUsize::new(0),
        };
        let out = Worker::new(partition(2, 3), &oracle, &control, None).run(&five_games());
        assert_eq!(out.state, WorkerState::Cancelled);
        // The game in flight (three plies) is finished; nothing after it starts.
        assert_eq!(out.records.len(), 3);
        assert_eq!(out.stats.games_replayed, 1);
        assert_eq!(oracle.applied.load(Ordering::Relaxed), 3);
    }
}
