//! Per-escape format specifiers: width, precision, justification and fill.
//!
//! A specifier is written between the `%` and the field identifier:
//!
//! | Syntax   | Meaning                                     |
//! |----------|---------------------------------------------|
//! | `-`      | left justify                                |
//! | `=`      | center justify                              |
//! | `0`      | fill with `0` instead of space              |
//! | `8`      | minimum width of 8 columns                  |
//! | `.8`     | maximum width of 8 columns (precision)      |
//!
//! So `%-8.8X` renders field `X` in exactly eight columns, left justified.

use crate::width::{clip_to_width, display_width, pad};

/// Horizontal alignment of rendered content within its allotted width.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Justify {
    /// Content first, fill after.
    Left,
    /// Fill first, content after.
    #[default]
    Right,
    /// Fill on both sides; an odd remainder column goes after the content.
    Center,
}

/// Width, precision, justification and fill for one expando.
///
/// Immutable once parsed. The default renders content as-is: no minimum,
/// no maximum, right justified, space filled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FormatSpec {
    /// Minimum width in display columns.
    pub min_cols: usize,
    /// Maximum width in display columns (`None` means unbounded).
    pub max_cols: Option<usize>,
    /// Alignment used when padding up to `min_cols`.
    pub justification: Justify,
    /// Character used for padding.
    pub leader: char,
}

impl Default for FormatSpec {
    fn default() -> Self {
        Self {
            min_cols: 0,
            max_cols: None,
            justification: Justify::Right,
            leader: ' ',
        }
    }
}

impl FormatSpec {
    /// Creates a specifier with explicit values.
    pub const fn new(
        min_cols: usize,
        max_cols: Option<usize>,
        justification: Justify,
        leader: char,
    ) -> Self {
        Self {
            min_cols,
            max_cols,
            justification,
            leader,
        }
    }

    /// Returns true when the specifier changes nothing.
    pub fn is_plain(&self) -> bool {
        self.min_cols == 0 && self.max_cols.is_none()
    }

    /// Lays out a string value under this specifier within `budget` columns.
    ///
    /// The value is clipped to the maximum width, then padded to the minimum
    /// width. Both limits are capped by `budget`, so the result never exceeds it.
    pub fn apply(&self, value: &str, budget: usize) -> String {
        if self.is_plain() {
            return clip_to_width(value, budget);
        }
        let max = self.max_cols.unwrap_or(usize::MAX).min(budget);
        let min = self.min_cols.min(budget);

        let clipped = clip_to_width(value, max);
        pad(&clipped, min, self.justification, self.leader)
    }

    /// Lays out a number under this specifier within `budget` columns.
    ///
    /// Behaves like [`apply`](Self::apply) on the decimal text, except that
    /// zero fill on a right-justified negative number keeps the sign in front
    /// of the zeros (`-005`, not `00-5`).
    pub fn apply_number(&self, value: i64, budget: usize) -> String {
        let text = value.to_string();
        let zero_filled = self.leader == '0' && self.justification == Justify::Right;
        if !(zero_filled && value < 0) {
            return self.apply(&text, budget);
        }

        let digits = &text[1..];
        let min = self.min_cols.min(budget);
        let max = self.max_cols.unwrap_or(usize::MAX).min(budget);
        let padded = pad(digits, min.saturating_sub(1), Justify::Right, '0');
        let signed = format!("-{}", padded);
        if display_width(&signed) > max {
            clip_to_width(&signed, max)
        } else {
            signed
        }
    }
}
