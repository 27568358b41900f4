//! The rules oracle: applies notated moves to board states under full
//! legality rules.
//!
//! Move legality is delegated to `shakmaty`; this module only adapts its
//! types to the projection the feature extractor reads.

use shakmaty::fen::Fen;
use shakmaty::san::SanPlus;
use shakmaty::{CastlingMode, Chess, Position, Role};
use tracing::trace;

use crate::color::Color;
use crate::error::OracleError;
use crate::piece_kind::PieceKind;
use crate::projection::BoardProjection;

/// Metadata about a move the oracle just applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveMeta {
    pub is_castle: bool,
    /// The side that made the move.
    pub mover: Color,
}

/// Applies notated moves to opaque board states.
///
/// Implementations must be shareable across worker threads.
pub trait RulesOracle: Sync {
    type State: Clone;

    /// The standard starting position.
    fn initial_state(&self) -> Self::State;

    /// A starting position given as FEN.
    fn state_from_fen(&self, fen: &str) -> Result<Self::State, OracleError>;

    /// Apply one SAN move, returning the new state and what kind of move it was.
    ///
    /// Fails with [`OracleError::IllegalMove`] if the token does not parse or
    /// the move is not legal in `state`.
    fn apply(&self, state: &Self::State, san: &str) -> Result<(Self::State, MoveMeta), OracleError>;

    /// Read-only view of a state.
    fn project(&self, state: &Self::State) -> BoardProjection;
}

/// Standard chess rules, backed by `shakmaty`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardChess;

impl RulesOracle for StandardChess {
    type State = Chess;

    fn initial_state(&self) -> Chess {
        Chess::default()
    }

    fn state_from_fen(&self, fen: &str) -> Result<Chess, OracleError> {
        let invalid = |reason: String| OracleError::InvalidFen {
            fen: fen.to_string(),
            reason,
        };
        let parsed: Fen = fen.trim().parse().map_err(|e| invalid(format!("{e}")))?;
        parsed
            .into_position(CastlingMode::Standard)
            .map_err(|e| invalid(format!("{e}")))
    }

    fn apply(&self, state: &Chess, san: &str) -> Result<(Chess, MoveMeta), OracleError> {
        let illegal = |reason: String| OracleError::IllegalMove {
            san: san.to_string(),
            reason,
        };
        let parsed: SanPlus = san.parse().map_err(|e| illegal(format!("{e}")))?;
        let mv = parsed.san.to_move(state).map_err(|e| {
            trace!(san, fullmove = state.fullmoves().get(), "move rejected");
            illegal(format!("{e}"))
        })?;

        let meta = MoveMeta {
            is_castle: mv.is_castle(),
            mover: color_from(state.turn()),
        };
        let mut next = state.clone();
        next.play_unchecked(&mv);
        Ok((next, meta))
    }

    fn project(&self, state: &Chess) -> BoardProjection {
        let board = state.board();
        let mut counts = [[0u8; PieceKind::COUNT]; Color::COUNT];
        for color in Color::ALL {
            let side = board.by_color(shakmaty_color(color));
            for kind in PieceKind::ALL {
                let n = (board.by_role(role_from(kind)) & side).count();
                counts[color.index()][kind.index()] = n as u8;
            }
        }
        BoardProjection::new(counts, color_from(state.turn()), state.fullmoves().get())
    }
}

fn color_from(color: shakmaty::Color) -> Color {
    match color {
        shakmaty::Color::White => Color::White,
        shakmaty::Color::Black => Color::Black,
    }
}

fn shakmaty_color(color: Color) -> shakmaty::Color {
    match color {
        Color::White => shakmaty::Color::White,
        Color::Black => shakmaty::Color::Black,
    }
}

fn role_from(kind: PieceKind) -> Role {
    match kind {
        PieceKind::Pawn => Role::Pawn,
        PieceKind::Knight => Role::Knight,
        PieceKind::Bishop => Role::Bishop,
        PieceKind::Rook => Role::Rook,
        PieceKind::Queen => Role::Queen,
        PieceKind::King => Role::King,
    }
}
