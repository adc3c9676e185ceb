//! The compiled form of one format string.

use tracing::debug;

use crate::error::ParseError;
use crate::node::Node;
use crate::parser::Parser;
use crate::registry::{FieldDef, RenderFlags, RenderRegistry};
use crate::render::render;

/// A parsed format string, ready to render any number of rows.
///
/// Immutable once built. When the source string changes a new `Expando` is
/// parsed and replaces the old one; see [`ExpandoCache`](crate::ExpandoCache).
///
/// ```rust
/// use expando::{Expando, ExpandoField, FieldDef, RenderData, RenderFlags, RenderRegistry, ValueType};
///
/// const DEFS: &[FieldDef] = &[FieldDef::new("n", "name", 0, 0, ValueType::String)];
///
/// fn name(_: &ExpandoField, row: &&str, _: RenderFlags) -> String {
///     row.to_string()
/// }
///
/// let registry = RenderRegistry::new(&[RenderData::string(0, 0, name)]).unwrap();
/// let exp = Expando::parse("[%-6n]", DEFS).unwrap();
/// assert_eq!(exp.render(&registry, &"mail", RenderFlags::empty(), 80), "[mail  ]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expando {
    source: String,
    nodes: Vec<Node>,
}

impl Expando {
    /// Compiles `source` against the field table `defs`.
    pub fn parse(source: &str, defs: &[FieldDef]) -> Result<Self, ParseError> {
        let nodes = Parser::new(defs).parse(source)?;
        debug!(
            len = source.len(),
            nodes = nodes.iter().map(Node::count).sum::<usize>(),
            "parsed format string"
        );
        Ok(Self {
            source: source.to_string(),
            nodes,
        })
    }

    /// The string this was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Top-level nodes.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Renders `row` in at most `max_cols` display columns (`usize::MAX` for
    /// no limit).
    pub fn render<T>(
        &self,
        registry: &RenderRegistry<T>,
        row: &T,
        flags: RenderFlags,
        max_cols: usize,
    ) -> String {
        render(&self.nodes, registry, row, flags, max_cols)
    }
}
