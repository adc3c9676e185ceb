//! Rendering compiled formats against a row.
//!
//! Rendering is a pure function of the tree, the registry, the row, the flags
//! and a column budget. Nodes are laid out left to right and each one is
//! capped by the columns still available, so the output never exceeds the
//! budget. Pass `usize::MAX` for an unbounded budget.
//!
//! # Padding
//!
//! Padding markers split the node sequence they appear in into segments:
//!
//! - `%|X` renders what precedes it, then fills to the end of the budget.
//!   Anything after it is dropped.
//! - `%>X` takes all the spare columns. Segments are laid out left to right,
//!   so with too little room the rightmost text is clipped first.
//! - `%*X` markers share the spare columns evenly, extra columns going to the
//!   later markers. When the first marker is soft the segments are laid out
//!   right to left, so the leftmost text is clipped first.
//!
//! With an unbounded budget there are no spare columns and markers render
//! nothing.

use crate::conddate;
use crate::node::{CondDate, ExpandoField, Node, PadKind, Padding};
use crate::registry::{RenderFlags, RenderRegistry};
use crate::width::{clip_to_width, display_width, fill};

/// Renders `nodes` for `row` in at most `max_cols` display columns.
///
/// # Panics
///
/// Panics if a field in the tree has no getter in `registry`. Parsing with a
/// field table that [`RenderRegistry::check`] accepts rules this out.
pub fn render<T>(
    nodes: &[Node],
    registry: &RenderRegistry<T>,
    row: &T,
    flags: RenderFlags,
    max_cols: usize,
) -> String {
    Renderer {
        registry,
        row,
        bounded: max_cols != usize::MAX,
    }
    .run(nodes, flags, max_cols)
}

struct Renderer<'a, T> {
    registry: &'a RenderRegistry<T>,
    row: &'a T,
    /// False for a `usize::MAX` budget; nested budgets stay unbounded.
    bounded: bool,
}

impl<T> Renderer<'_, T> {
    /// Renders a sibling sequence, resolving any padding markers in it.
    fn run(&self, nodes: &[Node], flags: RenderFlags, budget: usize) -> String {
        let markers: Vec<(usize, Padding)> = nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| n.as_padding().map(|p| (i, *p)))
            .collect();

        if markers.is_empty() {
            return self.sequence(nodes, flags, budget);
        }

        if let Some(&(eol, pad)) = markers.iter().find(|(_, p)| p.kind == PadKind::EndOfLine) {
            let mut out = self.run(&nodes[..eol], flags, budget);
            if self.bounded {
                let used = display_width(&out);
                out.push_str(&fill(pad.fill, budget.saturating_sub(used)));
            }
            return out;
        }

        let mut segments = Vec::with_capacity(markers.len() + 1);
        let mut from = 0;
        for &(i, _) in &markers {
            segments.push(&nodes[from..i]);
            from = i + 1;
        }
        segments.push(&nodes[from..]);

        let mut rendered = vec![String::new(); segments.len()];
        let mut remaining = budget;
        let mut lay_out = |i: usize| {
            let s = self.sequence(segments[i], flags, remaining);
            remaining = remaining.saturating_sub(display_width(&s));
            rendered[i] = s;
        };
        if markers[0].1.kind == PadKind::Soft {
            (0..segments.len()).rev().for_each(&mut lay_out);
        } else {
            (0..segments.len()).for_each(&mut lay_out);
        }

        let gap = if self.bounded { remaining } else { 0 };
        let widths = share_gap(&markers, gap);

        let mut out = String::new();
        for (i, segment) in rendered.iter().enumerate() {
            out.push_str(segment);
            if let Some(&(_, pad)) = markers.get(i) {
                out.push_str(&fill(pad.fill, widths[i]));
            }
        }
        out
    }

    /// Renders nodes one after another, each limited to what is left.
    fn sequence(&self, nodes: &[Node], flags: RenderFlags, budget: usize) -> String {
        let mut out = String::new();
        let mut remaining = budget;

        for node in nodes {
            if remaining == 0 {
                break;
            }
            let s = self.node(node, flags, remaining);
            remaining = remaining.saturating_sub(display_width(&s));
            out.push_str(&s);
        }
        out
    }

    fn node(&self, node: &Node, flags: RenderFlags, budget: usize) -> String {
        match node {
            Node::Text(text) => clip_to_width(text, budget),
            Node::Expando(field) => self.expando(field, flags, budget),
            Node::Conditional(cond) => {
                let flags = flags | RenderFlags::OPTIONAL;
                let branch = if self.test(&cond.condition, flags) {
                    &cond.if_true
                } else {
                    &cond.if_false
                };
                match branch {
                    Some(nodes) => self.run(nodes, flags, budget),
                    None => String::new(),
                }
            }
            // Only meaningful as a condition; padding is handled by `run`.
            Node::ConditionalDate(_) | Node::Padding(_) => String::new(),
        }
    }

    fn expando(&self, field: &ExpandoField, flags: RenderFlags, budget: usize) -> String {
        if let Some(get) = self.registry.string_getter(field.key) {
            return field.format.apply(&get(field, self.row, flags), budget);
        }
        match self.registry.number_getter(field.key) {
            Some(get) => field.format.apply_number(get(field, self.row, flags), budget),
            None => panic!("no getter registered for field {}", field.key),
        }
    }

    fn test(&self, condition: &Node, flags: RenderFlags) -> bool {
        match condition {
            Node::Expando(field) => {
                if let Some(get) = self.registry.number_getter(field.key) {
                    return get(field, self.row, flags) != 0;
                }
                match self.registry.string_getter(field.key) {
                    Some(get) => !get(field, self.row, flags).is_empty(),
                    None => panic!("no getter registered for field {}", field.key),
                }
            }
            Node::ConditionalDate(cd) => self.test_date(cd, flags),
            _ => false,
        }
    }

    fn test_date(&self, cd: &CondDate, flags: RenderFlags) -> bool {
        let Some(get) = self.registry.number_getter(cd.key) else {
            panic!("no timestamp getter registered for field {}", cd.key);
        };
        let field = ExpandoField::new(cd.key, Default::default());
        conddate::is_newer(get(&field, self.row, flags), cd.period, cd.count)
    }
}

/// Column widths for each marker out of `gap` spare columns.
///
/// The first hard marker takes everything. Otherwise soft markers split the
/// gap evenly and the remainder goes one column each to the last markers.
fn share_gap(markers: &[(usize, Padding)], gap: usize) -> Vec<usize> {
    let mut widths = vec![0; markers.len()];

    if let Some(hard) = markers.iter().position(|(_, p)| p.kind == PadKind::Hard) {
        widths[hard] = gap;
        return widths;
    }

    let n = markers.len();
    let (share, extra) = (gap / n, gap % n);
    for (i, w) in widths.iter_mut().enumerate() {
        *w = share + usize::from(i >= n - extra);
    }
    widths
}
