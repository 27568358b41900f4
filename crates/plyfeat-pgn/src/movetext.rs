//! Movetext lexing.
//!
//! Fed one line at a time so that brace comments and variations can span
//! lines. Only mainline SAN tokens are kept.

use crate::error::DecodeError;

const TERMINATION_MARKERS: [&str; 4] = ["1-0", "0-1", "1/2-1/2", "*"];

#[derive(Debug, Default)]
pub(crate) struct MovetextLexer {
    in_comment: bool,
    variation_depth: u32,
    terminated: bool,
    seen_content: bool,
    moves: Vec<String>,
    error: Option<DecodeError>,
}

impl MovetextLexer {
    /// `true` while inside an open `{` comment.
    pub(crate) fn in_comment(&self) -> bool {
        self.in_comment
    }

    /// `true` once any movetext (tokens or comments) has been fed.
    pub(crate) fn seen_content(&self) -> bool {
        self.seen_content
    }

    /// Lex one line of movetext.
    pub(crate) fn feed(&mut self, line: &str, line_number: u64) {
        let mut rest = line;
        loop {
            if self.in_comment {
                match rest.find('}') {
                    Some(end) => {
                        self.in_comment = false;
                        rest = &rest[end + 1..];
                    }
                    None => return,
                }
            }

            rest = rest.trim_start();
            let Some(c) = rest.chars().next() else {
                return;
            };
            self.seen_content = true;

            match c {
                '{' => {
                    self.in_comment = true;
                    rest = &rest[1..];
                }
                ';' => return,
                '(' => {
                    self.variation_depth += 1;
                    rest = &rest[1..];
                }
                ')' => {
                    if self.variation_depth == 0 {
                        self.fail(DecodeError::UnbalancedVariation { line: line_number });
                    } else {
                        self.variation_depth -= 1;
                    }
                    rest = &rest[1..];
                }
                '}' => rest = &rest[1..],
                _ => {
                    let end = rest
                        .find(|c: char| c.is_whitespace() || "{}();".contains(c))
                        .unwrap_or(rest.len());
                    let token = &rest[..end];
                    rest = &rest[end..];
                    if self.variation_depth == 0 && !self.terminated {
                        self.token(token);
                    }
                }
            }
        }
    }

    /// Finish the record, returning the mainline moves or the first error seen.
    pub(crate) fn finish(mut self, line_number: u64) -> Result<Vec<String>, DecodeError> {
        if self.in_comment {
            self.fail(DecodeError::UnterminatedComment { line: line_number });
        } else if self.variation_depth > 0 {
            self.fail(DecodeError::UnterminatedVariation { line: line_number });
        }
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.moves),
        }
    }

    fn fail(&mut self, err: DecodeError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    fn token(&mut self, token: &str) {
        if TERMINATION_MARKERS.contains(&token) {
            self.terminated = true;
            return;
        }
        if token.starts_with('$') {
            return;
        }

        let san = strip_move_number(token).trim_end_matches(['!', '?']);
        if san.is_empty() {
            return;
        }
        self.moves.push(normalize_castling(san));
    }
}

/// Strip a leading move number (`12.`, `12...`) glued to or standing in for
/// a token.
fn strip_move_number(token: &str) -> &str {
    let digits = token.trim_start_matches(|c: char| c.is_ascii_digit());
    if digits.len() == token.len() {
        return token;
    }
    if digits.is_empty() {
        return "";
    }
    match digits.strip_prefix('.') {
        Some(after) => after.trim_start_matches('.'),
        None => token,
    }
}

/// Accept the zero-digit castling spelling (`0-0`, `0-0-0`).
fn normalize_castling(san: &str) -> String {
    if san.starts_with("0-0") {
        san.replace('0', "O")
    } else {
        san.to_string()
    }
}
