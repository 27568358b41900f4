//! Core types for position feature extraction: colors, pieces, games,
//! board projections, the feature record, and the rules oracle seam.

mod color;
mod error;
mod features;
mod game;
mod oracle;
mod piece_kind;
mod projection;

pub use color::Color;
pub use error::OracleError;
pub use features::{
    CastleFlags, FEATURE_COLUMNS, FeatureRecord, extract, normalize_rating, normalize_turn,
};
pub use game::{DEFAULT_RATING, Game, GameResult, Ratings};
pub use oracle::{MoveMeta, RulesOracle, StandardChess};
pub use piece_kind::PieceKind;
pub use projection::BoardProjection;
