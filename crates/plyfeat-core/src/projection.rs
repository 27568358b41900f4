//! Read-only view of a board state, as exposed by a [`RulesOracle`](crate::RulesOracle).

use crate::color::Color;
use crate::piece_kind::PieceKind;

/// The observable part of a position: piece counts, side to move, and the
/// fullmove counter.
///
/// Castle flags are deliberately absent; they depend on the move history and
/// are tracked by whoever replays the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardProjection {
    /// Piece counts indexed by `[Color::index()][PieceKind::index()]`.
    counts: [[u8; PieceKind::COUNT]; Color::COUNT],
    side_to_move: Color,
    fullmove_number: u32,
}

impl BoardProjection {
    /// Build a projection from raw piece counts.
    pub const fn new(
        counts: [[u8; PieceKind::COUNT]; Color::COUNT],
        side_to_move: Color,
        fullmove_number: u32,
    ) -> Self {
        Self {
            counts,
            side_to_move,
            fullmove_number,
        }
    }

    /// The standard starting position, White to move on move 1.
    pub const fn starting_position() -> Self {
        const BACK: [u8; PieceKind::COUNT] = [8, 2, 2, 2, 1, 1];
        Self::new([BACK, BACK], Color::White, 1)
    }

    /// Number of `kind` pieces owned by `color`.
    #[inline]
    pub const fn count(&self, color: Color, kind: PieceKind) -> u8 {
        self.counts[color.index()][kind.index()]
    }

    #[inline]
    pub const fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub const fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Total material of one side.
    pub fn material(&self, color: Color) -> i32 {
        PieceKind::ALL
            .iter()
            .map(|&kind| i32::from(self.count(color, kind)) * kind.material_value())
            .sum()
    }

    /// White material minus Black material.
    pub fn material_diff(&self) -> i32 {
        self.material(Color::White) - self.material(Color::Black)
    }
}
