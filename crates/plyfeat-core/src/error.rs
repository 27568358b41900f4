//! Rules oracle errors.

/// Errors reported by a [`RulesOracle`](crate::RulesOracle).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    /// The move token is not valid SAN, or names a move that is illegal in
    /// the current position.
    #[error("illegal move {san}: {reason}")]
    IllegalMove {
        /// The offending move token.
        san: String,
        /// Why the oracle rejected it.
        reason: String,
    },

    /// A starting-position FEN could not be turned into a legal position.
    #[error("invalid FEN \"{fen}\": {reason}")]
    InvalidFen {
        /// The FEN string as found in the record.
        fen: String,
        /// Why it was rejected.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::OracleError;

    #[test]
    fn illegal_move_display() {
        let err = OracleError::IllegalMove {
            san: "Ke4".to_string(),
            reason: "illegal san".to_string(),
        };
        assert_eq!(format!("{err}"), "illegal move Ke4: illegal san");
    }
}
