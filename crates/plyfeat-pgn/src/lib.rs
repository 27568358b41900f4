//! Streaming PGN decoding for plyfeat.

mod decoder;
mod error;
mod movetext;
mod tags;

pub use decoder::PgnDecoder;
pub use error::DecodeError;
