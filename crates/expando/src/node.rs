//! The compiled tree of a format string.
//!
//! A parsed format is a `Vec<Node>` of siblings. Conditionals own their
//! condition and both branches outright, so the tree has no sharing and no
//! cycles; dropping the root drops everything.

use std::fmt;

use crate::format::FormatSpec;

/// Identifies a feature area (folder browser, index, pager, ...).
pub type DomainId = u16;

/// Identifies a field within its domain.
pub type UniqueId = u16;

/// The `(domain, uid)` pair that links a parsed field to its getters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldKey {
    pub domain: DomainId,
    pub uid: UniqueId,
}

impl FieldKey {
    pub const fn new(domain: DomainId, uid: UniqueId) -> Self {
        Self { domain, uid }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.domain, self.uid)
    }
}

/// A resolved `%X` escape: which field, how to lay it out, and its enclosed
/// argument if the field takes one (for example the strftime pattern of
/// `%[%b %d]`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpandoField {
    pub key: FieldKey,
    pub format: FormatSpec,
    pub arg: Option<String>,
}

impl ExpandoField {
    pub fn new(key: FieldKey, format: FormatSpec) -> Self {
        Self {
            key,
            format,
            arg: None,
        }
    }

    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.arg = Some(arg.into());
        self
    }
}

/// Unit of a date condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Period {
    Year,
    Month,
    Week,
    Day,
    Hour,
    Minute,
}

impl Period {
    /// Characters accepted as a period, in order.
    pub const CHARS: &'static str = "ymwdHM";

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'y' => Some(Self::Year),
            'm' => Some(Self::Month),
            'w' => Some(Self::Week),
            'd' => Some(Self::Day),
            'H' => Some(Self::Hour),
            'M' => Some(Self::Minute),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::Year => 'y',
            Self::Month => 'm',
            Self::Week => 'w',
            Self::Day => 'd',
            Self::Hour => 'H',
            Self::Minute => 'M',
        }
    }
}

/// A date condition such as `%<[3d?...>`: "is this field's timestamp newer
/// than three days ago?". A zero count means "since the start of this period".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CondDate {
    pub key: FieldKey,
    pub count: u16,
    pub period: Period,
}

/// How a padding marker claims the columns left over in its run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PadKind {
    /// `%|X`: render what precedes, fill to the end of the line, drop the rest.
    EndOfLine,
    /// `%>X`: take the whole gap; content to the left keeps priority.
    Hard,
    /// `%*X`: share the gap; content to the right keeps priority.
    Soft,
}

impl PadKind {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '|' => Some(Self::EndOfLine),
            '>' => Some(Self::Hard),
            '*' => Some(Self::Soft),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Padding {
    pub kind: PadKind,
    pub fill: char,
}

/// A two-way conditional.
///
/// A branch of `None` was not written at all (`%<a?x>` has no false branch);
/// `Some(vec![])` was written but is empty (`%<a?&x>`). Both render nothing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Conditional {
    pub condition: Box<Node>,
    pub if_true: Option<Vec<Node>>,
    pub if_false: Option<Vec<Node>>,
}

/// One element of a compiled format.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    /// Literal text, escapes already resolved.
    Text(String),
    /// A field to be rendered through the registry.
    Expando(ExpandoField),
    /// `%<cond?true&false>`.
    Conditional(Conditional),
    /// The condition of a date conditional; only appears as a condition.
    ConditionalDate(CondDate),
    /// `%|X`, `%>X` or `%*X`.
    Padding(Padding),
}

impl Node {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_expando(&self) -> Option<&ExpandoField> {
        match self {
            Node::Expando(field) => Some(field),
            _ => None,
        }
    }

    pub fn as_conditional(&self) -> Option<&Conditional> {
        match self {
            Node::Conditional(cond) => Some(cond),
            _ => None,
        }
    }

    pub fn as_cond_date(&self) -> Option<&CondDate> {
        match self {
            Node::ConditionalDate(cd) => Some(cd),
            _ => None,
        }
    }

    pub fn as_padding(&self) -> Option<&Padding> {
        match self {
            Node::Padding(p) => Some(p),
            _ => None,
        }
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn count(&self) -> usize {
        match self {
            Node::Conditional(c) => {
                let branch = |b: &Option<Vec<Node>>| {
                    b.as_deref()
                        .map_or(0, |nodes| nodes.iter().map(Node::count).sum())
                };
                1 + c.condition.count() + branch(&c.if_true) + branch(&c.if_false)
            }
            _ => 1,
        }
    }
}
