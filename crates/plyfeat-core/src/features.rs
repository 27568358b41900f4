//! Position feature extraction.
//!
//! Every normalization here is a fixed contract of the output dataset:
//! downstream consumers invert them, so they must not change.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::game::{GameResult, Ratings};
use crate::piece_kind::PieceKind;
use crate::projection::BoardProjection;

const RATING_FLOOR: f64 = 1000.0;
const RATING_SPAN: f64 = 3000.0 - RATING_FLOOR;
const TURN_SCALE: f64 = 60.0;

/// Output column names, in order.
pub const FEATURE_COLUMNS: [&str; 10] = [
    "white_pawns",
    "black_pawns",
    "turn",
    "white_castled",
    "black_castled",
    "white_elo",
    "black_elo",
    "material_diff",
    "is_white_turn",
    "result",
];

/// Map a rating onto `[0, 1]` over the domain `[1000, 3000]`.
///
/// Ratings outside the domain are not clamped.
#[inline]
pub fn normalize_rating(rating: i32) -> f64 {
    (f64::from(rating) - RATING_FLOOR) / RATING_SPAN
}

#[inline]
pub fn normalize_turn(fullmove_number: u32) -> f64 {
    f64::from(fullmove_number) / TURN_SCALE
}

/// Per-side "has castled" flags for the game being replayed.
///
/// Flags only ever go from `false` to `true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CastleFlags {
    white: bool,
    black: bool,
}

impl CastleFlags {
    /// Record that `color` has castled.
    pub fn mark(&mut self, color: Color) {
        match color {
            Color::White => self.white = true,
            Color::Black => self.black = true,
        }
    }

    pub const fn has_castled(&self, color: Color) -> bool {
        match color {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }
}

/// One row of the output dataset.
///
/// Only [`extract`] builds these, so the 0/1 columns always hold 0 or 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    #[serde(rename = "white_pawns")]
    pub white_pawn_count: u8,
    #[serde(rename = "black_pawns")]
    pub black_pawn_count: u8,
    #[serde(rename = "turn")]
    pub normalized_turn: f64,
    pub white_castled: u8,
    pub black_castled: u8,
    #[serde(rename = "white_elo")]
    pub normalized_white_rating: f64,
    #[serde(rename = "black_elo")]
    pub normalized_black_rating: f64,
    pub material_diff: i32,
    #[serde(rename = "is_white_turn")]
    pub side_to_move_is_white: u8,
    pub result: Option<u8>,
}

/// Compute the feature row for one position.
pub fn extract(
    board: &BoardProjection,
    ratings: Ratings,
    castled: CastleFlags,
    result: GameResult,
) -> FeatureRecord {
    FeatureRecord {
        white_pawn_count: board.count(Color::White, PieceKind::Pawn),
        black_pawn_count: board.count(Color::Black, PieceKind::Pawn),
        normalized_turn: normalize_turn(board.fullmove_number()),
        white_castled: u8::from(castled.has_castled(Color::White)),
        black_castled: u8::from(castled.has_castled(Color::Black)),
        normalized_white_rating: normalize_rating(ratings.white),
        normalized_black_rating: normalize_rating(ratings.black),
        material_diff: board.material_diff(),
        side_to_move_is_white: u8::from(board.side_to_move().is_white()),
        result: result.label(),
    }
}
