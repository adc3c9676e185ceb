//! Error types for the expando crate.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::node::FieldKey;

/// What went wrong while compiling a format string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// The identifier after `%` is not in the field table.
    UnknownIdentifier,
    /// A width, precision or count does not fit its integer type.
    NumberOverflow,
    /// A date condition used a period outside `ymwdHM`.
    InvalidPeriodChar,
    /// A `%<` was never closed by `>`.
    UnterminatedConditional,
    /// A conditional had more than one `&`.
    UnbalancedConditional,
    /// Conflicting justification flags.
    InvalidFlag,
    /// A malformed escape: no digits after `.`, or input ends mid-escape.
    InvalidFormat,
    /// Something other than a field was used as a condition, or `?` is missing.
    InvalidCondition,
    /// An enclosed argument is missing its closing character.
    UnterminatedArgument,
}

impl ParseErrorKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::UnknownIdentifier => "unknown identifier",
            Self::NumberOverflow => "number overflow",
            Self::InvalidPeriodChar => "invalid period",
            Self::UnterminatedConditional => "unterminated conditional",
            Self::UnbalancedConditional => "unbalanced conditional",
            Self::InvalidFlag => "invalid flag",
            Self::InvalidFormat => "invalid format",
            Self::InvalidCondition => "invalid condition",
            Self::UnterminatedArgument => "unterminated argument",
        }
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A format string failed to compile.
///
/// `position` is a byte offset into the source string, pointing at the
/// character that could not be accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (at offset {position})")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub position: usize,
    pub message: String,
}

impl ParseError {
    /// Create a parse error.
    pub fn new(kind: ParseErrorKind, position: usize, message: impl Into<String>) -> Self {
        Self {
            kind,
            position,
            message: message.into(),
        }
    }
}

/// A render registry could not be built, or disagrees with a field table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A record has neither a string nor a number getter.
    #[error("record {0} has no getter")]
    MissingGetter(FieldKey),

    /// Two records share the same key.
    #[error("duplicate record for {0}")]
    DuplicateKey(FieldKey),

    /// A field cannot be rendered with the getters registered for it.
    #[error("field '{name}' ({key}): {reason}")]
    Mismatch {
        name: &'static str,
        key: FieldKey,
        reason: &'static str,
    },
}

/// Errors loading or querying a format configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read or written.
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configuration is not valid YAML, or not a map of strings.
    #[error("invalid format configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// No format string is configured under this key.
    #[error("no format configured for '{0}'")]
    UnknownKey(String),
}

/// Any error produced by this crate.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for expando operations.
pub type Result<T> = std::result::Result<T, Error>;
