//! Resumable, record-at-a-time PGN decoder.

use std::io::BufRead;

use tracing::{debug, trace};

use plyfeat_core::{DEFAULT_RATING, Game, GameResult};

use crate::error::DecodeError;
use crate::movetext::MovetextLexer;
use crate::tags::parse_tag_pair;

/// Decodes successive games from a buffered PGN stream.
///
/// Each call to [`decode_next`](PgnDecoder::decode_next) consumes exactly one
/// record, even when that record turns out to be malformed, so a caller can
/// log the error and carry on with the next one.
pub struct PgnDecoder<R> {
    reader: R,
    buf: Vec<u8>,
    pending: Option<String>,
    line_number: u64,
    records_read: u64,
}

/// Header fields collected from a tag section.
#[derive(Default)]
struct Headers {
    game: Game,
    error: Option<DecodeError>,
}

impl Headers {
    fn apply(&mut self, line: &str, line_number: u64) {
        let Some((name, value)) = parse_tag_pair(line) else {
            self.fail(DecodeError::MalformedTag {
                line: line_number,
                text: line.to_string(),
            });
            return;
        };
        match name {
            "WhiteElo" => match parse_rating(&value) {
                Some(r) => self.game.ratings.white = r,
                None => self.fail(DecodeError::InvalidRating {
                    line: line_number,
                    tag: "WhiteElo",
                    value,
                }),
            },
            "BlackElo" => match parse_rating(&value) {
                Some(r) => self.game.ratings.black = r,
                None => self.fail(DecodeError::InvalidRating {
                    line: line_number,
                    tag: "BlackElo",
                    value,
                }),
            },
            "Result" => self.game.result = GameResult::from_tag(&value),
            "FEN" => self.game.start_fen = Some(value),
            _ => {}
        }
    }

    fn fail(&mut self, err: DecodeError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }
}

/// Placeholders (`?`, `-`, empty) fall back to the default rating.
fn parse_rating(value: &str) -> Option<i32> {
    match value.trim() {
        "" | "?" | "-" => Some(DEFAULT_RATING),
        v => v.parse().ok(),
    }
}

impl<R: BufRead> PgnDecoder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            pending: None,
            line_number: 0,
            records_read: 0,
        }
    }

    /// Number of records consumed so far, malformed ones included.
    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    /// Decode the next game.
    ///
    /// Returns `Ok(None)` at end of stream. A malformed record is consumed in
    /// full before its error is returned.
    pub fn decode_next(&mut self) -> Result<Option<Game>, DecodeError> {
        let Some(first) = self.next_content_line()? else {
            return Ok(None);
        };
        self.records_read += 1;
        let record = self.records_read;

        let mut headers = Headers::default();
        let mut line = Some(first);
        while let Some(l) = line.take() {
            let trimmed = l.trim();
            if !trimmed.starts_with('[') {
                line = Some(l);
                break;
            }
            headers.apply(trimmed, self.line_number);
            line = self.next_line()?;
        }

        let mut lexer = MovetextLexer::default();
        while let Some(l) = line.take() {
            let trimmed = l.trim();
            if !lexer.in_comment() {
                if trimmed.starts_with('[') {
                    // Start of the next record's tag section.
                    self.line_number -= 1;
                    self.pending = Some(l);
                    break;
                }
                if trimmed.is_empty() && lexer.seen_content() {
                    break;
                }
                if trimmed.starts_with('%') {
                    line = self.next_line()?;
                    continue;
                }
            }
            lexer.feed(&l, self.line_number);
            line = self.next_line()?;
        }

        let moves = match (headers.error, lexer.finish(self.line_number)) {
            (Some(err), _) | (None, Err(err)) => {
                debug!(record, error = %err, "malformed PGN record");
                return Err(err);
            }
            (None, Ok(moves)) => moves,
        };

        let mut game = headers.game;
        game.moves = moves;
        trace!(record, plies = game.moves.len(), "decoded PGN record");
        Ok(Some(game))
    }

    /// Next line that can start a record: skips blank lines and `%` escapes.
    fn next_content_line(&mut self) -> Result<Option<String>, DecodeError> {
        while let Some(line) = self.next_line()? {
            let trimmed = line.trim();
            if !trimmed.is_empty() && !trimmed.starts_with('%') {
                return Ok(Some(line));
            }
        }
        Ok(None)
    }

    fn next_line(&mut self) -> Result<Option<String>, DecodeError> {
        if let Some(line) = self.pending.take() {
            self.line_number += 1;
            return Ok(Some(line));
        }
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }
        self.line_number += 1;
        let line = String::from_utf8_lossy(&self.buf);
        let mut line = line.trim_end_matches(['\n', '\r']);
        if self.line_number == 1 {
            line = line.strip_prefix('\u{FEFF}').unwrap_or(line);
        }
        Ok(Some(line.to_string()))
    }
}
