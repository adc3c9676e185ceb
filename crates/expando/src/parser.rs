//! Recursive-descent parser from format strings to [`Node`] trees.
//!
//! ```text
//! format             := node*
//! node               := text | plain-escape | padding-escape | conditional-escape
//! plain-escape       := '%' flags? width? ('.' precision)? identifier argument?
//! padding-escape     := '%' ('|' | '>' | '*') fill-char
//! conditional-escape := '%<' identifier conddate? '?' format ('&' format)? '>'
//! conddate           := digits? period
//! ```
//!
//! Identifiers are resolved against a field table; when several short names
//! match, the longest wins.

use crate::error::{ParseError, ParseErrorKind};
use crate::format::{FormatSpec, Justify};
use crate::lexer::{Lexer, Mode, Token};
use crate::node::{CondDate, Conditional, ExpandoField, Node, PadKind, Padding, Period};
use crate::registry::{FieldDef, FieldSyntax};

/// Parses format strings against one field table.
#[derive(Debug, Clone, Copy)]
pub struct Parser<'d> {
    defs: &'d [FieldDef],
}

/// What ended a node sequence.
enum Stop {
    Eof,
    Else(usize),
    End,
}

impl<'d> Parser<'d> {
    pub fn new(defs: &'d [FieldDef]) -> Self {
        Self { defs }
    }

    /// Parses a whole format string.
    pub fn parse(&self, input: &str) -> Result<Vec<Node>, ParseError> {
        let mut lexer = Lexer::new(input);
        let (nodes, _) = self.sequence(&mut lexer, Mode::TopLevel)?;
        Ok(nodes)
    }

    /// Longest short name in the table that prefixes `rest`.
    fn lookup(&self, rest: &str) -> Option<&'d FieldDef> {
        self.defs
            .iter()
            .filter(|def| !def.short_name.is_empty() && rest.starts_with(def.short_name))
            .max_by_key(|def| def.short_name.len())
    }

    fn sequence(&self, lexer: &mut Lexer<'_>, mode: Mode) -> Result<(Vec<Node>, Stop), ParseError> {
        let mut nodes = Vec::new();

        while let Some((start, token)) = lexer.next_token(mode) {
            match token {
                Token::Text(text) => nodes.push(Node::Text(text)),
                Token::Escape => nodes.push(self.escape(lexer, start)?),
                Token::BranchElse => return Ok((nodes, Stop::Else(start))),
                Token::BranchEnd => return Ok((nodes, Stop::End)),
            }
        }

        Ok((nodes, Stop::Eof))
    }

    /// Parses what follows a `%` that started at `start`.
    fn escape(&self, lexer: &mut Lexer<'_>, start: usize) -> Result<Node, ParseError> {
        let Some(c) = lexer.peek() else {
            return Err(ParseError::new(
                ParseErrorKind::InvalidFormat,
                start,
                "Format string ends in the middle of an escape",
            ));
        };

        if c == '<' {
            lexer.bump();
            return self.conditional(lexer, start);
        }

        if let Some(kind) = PadKind::from_char(c) {
            lexer.bump();
            let fill_pos = lexer.position();
            let fill = lexer.bump().ok_or_else(|| {
                ParseError::new(
                    ParseErrorKind::InvalidFormat,
                    fill_pos,
                    "Padding is missing its fill character",
                )
            })?;
            return Ok(Node::Padding(Padding { kind, fill }));
        }

        self.plain(lexer)
    }

    /// `[flags][width][.precision]identifier[argument]`
    fn plain(&self, lexer: &mut Lexer<'_>) -> Result<Node, ParseError> {
        let mut format = FormatSpec::default();
        let mut justify: Option<char> = None;

        loop {
            let pos = lexer.position();
            let flag = match lexer.peek() {
                Some(c @ ('-' | '=')) => c,
                Some('0') => {
                    lexer.bump();
                    format.leader = '0';
                    continue;
                }
                _ => break,
            };
            if let Some(seen) = justify {
                if seen != flag {
                    return Err(ParseError::new(
                        ParseErrorKind::InvalidFlag,
                        pos,
                        format!("Conflicting justification flags '{}' and '{}'", seen, flag),
                    ));
                }
            }
            lexer.bump();
            justify = Some(flag);
            format.justification = if flag == '-' {
                Justify::Left
            } else {
                Justify::Center
            };
        }

        if let Some(width) = lexer.number()? {
            format.min_cols = usize::from(width);
        }

        if lexer.eat('.') {
            let pos = lexer.position();
            let precision = lexer.number()?.ok_or_else(|| {
                ParseError::new(
                    ParseErrorKind::InvalidFormat,
                    pos,
                    "Expected a number after '.'",
                )
            })?;
            format.max_cols = Some(usize::from(precision));
        }

        let def = self.identifier(lexer)?;
        let mut field = ExpandoField::new(def.key(), format);

        if let FieldSyntax::Date { close } = def.syntax {
            let pos = lexer.position();
            let arg = lexer.argument(close).ok_or_else(|| {
                ParseError::new(
                    ParseErrorKind::UnterminatedArgument,
                    pos,
                    format!("Missing '{}' after '{}' argument", close, def.short_name),
                )
            })?;
            field = field.with_arg(arg);
        }

        Ok(Node::Expando(field))
    }

    fn identifier(&self, lexer: &mut Lexer<'_>) -> Result<&'d FieldDef, ParseError> {
        let pos = lexer.position();
        let Some(c) = lexer.peek() else {
            return Err(ParseError::new(
                ParseErrorKind::InvalidFormat,
                pos,
                "Format string ends in the middle of an escape",
            ));
        };

        let def = self.lookup(lexer.rest()).ok_or_else(|| {
            ParseError::new(
                ParseErrorKind::UnknownIdentifier,
                pos,
                format!("Unknown expando: '{}'", c),
            )
        })?;
        lexer.advance(def.short_name.len());
        Ok(def)
    }

    /// `%<` has been consumed; `start` is the offset of the `%`.
    fn conditional(&self, lexer: &mut Lexer<'_>, start: usize) -> Result<Node, ParseError> {
        let condition = self.condition(lexer, start)?;

        let pos = lexer.position();
        match lexer.bump() {
            Some('?') => {}
            None => return Err(unterminated(start)),
            Some(c) => {
                return Err(ParseError::new(
                    ParseErrorKind::InvalidCondition,
                    pos,
                    format!("Expected '?' after the condition, found '{}'", c),
                ))
            }
        }

        let (if_true, stop) = self.sequence(lexer, Mode::Branch)?;
        let if_false = match stop {
            Stop::Eof => return Err(unterminated(start)),
            Stop::End => None,
            Stop::Else(_) => {
                let (if_false, stop) = self.sequence(lexer, Mode::Branch)?;
                match stop {
                    Stop::Eof => return Err(unterminated(start)),
                    Stop::Else(pos) => {
                        return Err(ParseError::new(
                            ParseErrorKind::UnbalancedConditional,
                            pos,
                            "Conditional has more than one '&'",
                        ))
                    }
                    Stop::End => Some(if_false),
                }
            }
        };

        Ok(Node::Conditional(Conditional {
            condition: Box::new(condition),
            if_true: Some(if_true),
            if_false,
        }))
    }

    fn condition(&self, lexer: &mut Lexer<'_>, start: usize) -> Result<Node, ParseError> {
        let pos = lexer.position();
        match lexer.peek() {
            None => return Err(unterminated(start)),
            Some(c) if PadKind::from_char(c).is_some() => {
                return Err(ParseError::new(
                    ParseErrorKind::InvalidCondition,
                    pos,
                    "Padding cannot be used as a condition",
                ))
            }
            Some(_) => {}
        }

        let def = self.identifier(lexer)?;
        if !matches!(def.syntax, FieldSyntax::Date { .. }) {
            return Ok(Node::Expando(ExpandoField::new(def.key(), FormatSpec::default())));
        }

        let count = lexer.number()?.unwrap_or(0);
        let pos = lexer.position();
        let period = match lexer.bump() {
            None => return Err(unterminated(start)),
            Some(c) => Period::from_char(c).ok_or_else(|| {
                ParseError::new(
                    ParseErrorKind::InvalidPeriodChar,
                    pos,
                    format!(
                        "Invalid time period: '{}', must be one of '{}'",
                        c,
                        Period::CHARS
                    ),
                )
            })?,
        };

        Ok(Node::ConditionalDate(CondDate {
            key: def.key(),
            count,
            period,
        }))
    }
}

fn unterminated(start: usize) -> ParseError {
    ParseError::new(
        ParseErrorKind::UnterminatedConditional,
        start,
        "Conditional is missing its closing '>'",
    )
}

/// Parses `input` against `defs`.
pub fn parse(input: &str, defs: &[FieldDef]) -> Result<Vec<Node>, ParseError> {
    Parser::new(defs).parse(input)
}
