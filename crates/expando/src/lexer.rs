//! Scanner for format strings.
//!
//! The lexer splits input into literal text runs and the points where a
//! `%` escape begins. What follows a `%` depends on the field table, so the
//! parser drives the lexer character by character from there.
//!
//! Text runs resolve two kinds of escape:
//!
//! - `%%` is a literal percent sign.
//! - `\c` is the literal character `c`. This is how `&` and `>` are written
//!   inside a conditional branch, where they would otherwise end the branch.
//!   A backslash at the very end of the input is kept as is.

use crate::error::{ParseError, ParseErrorKind};

/// Token types produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Literal text with escapes resolved.
    Text(String),
    /// A `%` introducing an escape (already consumed).
    Escape,
    /// `&` separating the branches of a conditional.
    BranchElse,
    /// `>` closing a conditional.
    BranchEnd,
}

/// Where the lexer is scanning: `&` and `>` only delimit inside a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    TopLevel,
    Branch,
}

/// Cursor over a format string.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Current byte offset.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Unconsumed input.
    pub fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consumes `c` if it is next.
    pub fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    /// Skips `len` bytes; `len` must land on a character boundary.
    pub fn advance(&mut self, len: usize) {
        self.pos = (self.pos + len).min(self.input.len());
    }

    /// Returns the next token, with the position where it starts.
    pub fn next_token(&mut self, mode: Mode) -> Option<(usize, Token)> {
        let start = self.pos;
        let c = self.peek()?;

        if mode == Mode::Branch {
            if c == '&' {
                self.pos += 1;
                return Some((start, Token::BranchElse));
            }
            if c == '>' {
                self.pos += 1;
                return Some((start, Token::BranchEnd));
            }
        }

        if c == '%' && !self.rest().starts_with("%%") {
            self.pos += 1;
            return Some((start, Token::Escape));
        }

        Some((start, Token::Text(self.text_run(mode))))
    }

    /// Reads literal text up to the next escape or delimiter.
    fn text_run(&mut self, mode: Mode) -> String {
        let mut text = String::new();

        while let Some(c) = self.peek() {
            match c {
                '%' => {
                    if self.rest().starts_with("%%") {
                        self.pos += 2;
                        text.push('%');
                    } else {
                        break;
                    }
                }
                '&' | '>' if mode == Mode::Branch => break,
                '\\' => {
                    self.pos += 1;
                    match self.bump() {
                        Some(escaped) => text.push(escaped),
                        None => text.push('\\'),
                    }
                }
                _ => {
                    self.pos += c.len_utf8();
                    text.push(c);
                }
            }
        }

        text
    }

    /// Reads an optional run of decimal digits.
    ///
    /// Values that do not fit below `u16::MAX` are rejected; the error points
    /// at the first digit.
    pub fn number(&mut self) -> Result<Option<u16>, ParseError> {
        let start = self.pos;
        let digits = self
            .rest()
            .bytes()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if digits == 0 {
            return Ok(None);
        }

        let text = &self.input[start..start + digits];
        self.pos += digits;
        match text.parse::<u16>() {
            Ok(n) if n < u16::MAX => Ok(Some(n)),
            _ => Err(ParseError::new(
                ParseErrorKind::NumberOverflow,
                start,
                format!("Invalid number: {}", text),
            )),
        }
    }

    /// Reads an enclosed argument up to `close`, consuming the closing character.
    pub fn argument(&mut self, close: char) -> Option<&'a str> {
        let rest = self.rest();
        let end = rest.find(close)?;
        self.pos += end + close.len_utf8();
        Some(&rest[..end])
    }
}
