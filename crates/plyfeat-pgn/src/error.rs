//! PGN decoding errors.

/// Errors produced while decoding a PGN record.
///
/// Every variant except [`DecodeError::Io`] describes a malformed record. The
/// decoder consumes the whole offending record before returning one of these,
/// so decoding can resume with the next record.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// A tag pair line is not of the form `[Name "Value"]`.
    #[error("line {line}: malformed tag pair: {text}")]
    MalformedTag {
        /// One-based line number in the stream.
        line: u64,
        /// The offending line, trimmed.
        text: String,
    },

    /// A rating tag holds something other than an integer or a placeholder.
    #[error("line {line}: invalid {tag} value \"{value}\"")]
    InvalidRating {
        /// One-based line number in the stream.
        line: u64,
        /// The tag name (`WhiteElo` or `BlackElo`).
        tag: &'static str,
        /// The tag value.
        value: String,
    },

    /// A `)` appeared with no open variation.
    #[error("line {line}: unbalanced ')' in movetext")]
    UnbalancedVariation {
        /// One-based line number in the stream.
        line: u64,
    },

    /// The record ended inside a `{` comment.
    #[error("line {line}: unterminated comment")]
    UnterminatedComment {
        /// Line on which the record ended.
        line: u64,
    },

    /// The record ended inside a `(` variation.
    #[error("line {line}: unterminated variation")]
    UnterminatedVariation {
        /// Line on which the record ended.
        line: u64,
    },

    /// Reading the underlying stream failed.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
