//! Decoded game records.

/// Rating assumed when a record carries no usable rating header.
pub const DEFAULT_RATING: i32 = 1500;

/// Final outcome of a game, as declared by its `Result` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameResult {
    WhiteWin,
    BlackWin,
    Draw,
    #[default]
    Unknown,
}

impl GameResult {
    /// Interpret a `Result` tag value. Anything unrecognized (including `*`)
    /// is [`GameResult::Unknown`].
    pub fn from_tag(value: &str) -> GameResult {
        match value.trim() {
            "1-0" => GameResult::WhiteWin,
            "0-1" => GameResult::BlackWin,
            "1/2-1/2" => GameResult::Draw,
            _ => GameResult::Unknown,
        }
    }

    /// Numeric training label: White win 2, draw 1, Black win 0.
    pub const fn label(self) -> Option<u8> {
        match self {
            GameResult::WhiteWin => Some(2),
            GameResult::Draw => Some(1),
            GameResult::BlackWin => Some(0),
            GameResult::Unknown => None,
        }
    }
}

/// Both players' ratings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ratings {
    pub white: i32,
    pub black: i32,
}

impl Default for Ratings {
    fn default() -> Self {
        Self {
            white: DEFAULT_RATING,
            black: DEFAULT_RATING,
        }
    }
}

/// One decoded game: header metadata plus the mainline move list.
///
/// Moves are kept as opaque SAN tokens; only the rules oracle interprets them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Game {
    pub ratings: Ratings,
    pub result: GameResult,
    /// Starting position from a `FEN` tag, if the game does not begin from
    /// the standard setup.
    pub start_fen: Option<String>,
    pub moves: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_tags() {
        assert_eq!(GameResult::from_tag("1-0"), GameResult::WhiteWin);
        assert_eq!(GameResult::from_tag("0-1"), GameResult::BlackWin);
        assert_eq!(GameResult::from_tag("1/2-1/2"), GameResult::Draw);
        assert_eq!(GameResult::from_tag("*"), GameResult::Unknown);
        assert_eq!(GameResult::from_tag("draw"), GameResult::Unknown);
    }

    #[test]
    fn labels() {
        assert_eq!(GameResult::WhiteWin.label(), Some(2));
        assert_eq!(GameResult::Draw.label(), Some(1));
        assert_eq!(GameResult::BlackWin.label(), Some(0));
        assert_eq!(GameResult::Unknown.label(), None);
    }

    #[test]
    fn default_game_has_default_ratings() {
        let game = Game::default();
        assert_eq!(game.ratings.white, DEFAULT_RATING);
        assert_eq!(game.ratings.black, DEFAULT_RATING);
        assert_eq!(game.result, GameResult::Unknown);
        assert!(game.moves.is_empty());
    }
}
