//! Display-width measurement, clipping and padding.
//!
//! Every function here counts terminal columns rather than bytes or code
//! points: CJK and emoji glyphs occupy two columns, combining marks occupy
//! none, and ANSI escape sequences are carried through without being counted.

use console::measure_text_width;
use unicode_width::UnicodeWidthChar;

use crate::format::Justify;

/// Returns the display width of a string, ignoring ANSI escape codes.
///
/// # Example
///
/// ```rust
/// use expando::width::display_width;
///
/// assert_eq!(display_width("hello"), 5);
/// assert_eq!(display_width("\x1b[31mred\x1b[0m"), 3);
/// assert_eq!(display_width("日本"), 4);
/// ```
pub fn display_width(s: &str) -> usize {
    measure_text_width(s)
}

/// Display width of a single character (zero for control and combining characters).
pub fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

/// Keeps the longest prefix of `s` that fits in `max_width` columns.
///
/// No marker is appended. A glyph that would straddle the limit is dropped
/// whole, so the result may be one column narrower than `max_width`.
/// Escape sequences are copied through untouched.
///
/// # Example
///
/// ```rust
/// use expando::width::clip_to_width;
///
/// assert_eq!(clip_to_width("Hello World", 5), "Hello");
/// assert_eq!(clip_to_width("日本語", 3), "日");
/// ```
pub fn clip_to_width(s: &str, max_width: usize) -> String {
    if measure_text_width(s) <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut result = String::with_capacity(s.len());
    let mut in_escape = false;

    for c in s.chars() {
        if c == '\x1b' {
            result.push(c);
            in_escape = true;
            continue;
        }

        if in_escape {
            result.push(c);
            // CSI sequences end with a letter (@ through ~)
            if c.is_ascii_alphabetic() || c == '~' {
                in_escape = false;
            }
            continue;
        }

        // Re-measure the prefix: variation selectors and joiners change the
        // width of what precedes them.
        result.push(c);
        if measure_text_width(&result) > max_width {
            result.pop();
            break;
        }
    }

    result
}

/// Builds exactly `cols` columns of filler.
///
/// The fill glyph is repeated while it fits; any columns left over (a wide
/// glyph that does not fit, or a zero-width one) are completed with spaces.
///
/// ```rust
/// use expando::width::fill;
///
/// assert_eq!(fill('-', 4), "----");
/// assert_eq!(fill('日', 5), "日日 ");
/// ```
pub fn fill(fill: char, cols: usize) -> String {
    let w = char_width(fill);
    let mut out = String::with_capacity(cols);
    let mut remaining = cols;

    if w > 0 {
        while w <= remaining {
            out.push(fill);
            remaining -= w;
        }
    }
    out.push_str(&" ".repeat(remaining));
    out
}

/// Pads `s` with `fill` to at least `width` columns.
///
/// Strings already `width` columns or wider are returned unchanged (no
/// truncation). For [`Justify::Center`] an odd remainder column goes on the
/// trailing side.
///
/// ```rust
/// use expando::Justify;
/// use expando::width::pad;
///
/// assert_eq!(pad("42", 5, Justify::Right, ' '), "   42");
/// assert_eq!(pad("42", 5, Justify::Left, '.'), "42...");
/// assert_eq!(pad("hi", 5, Justify::Center, ' '), " hi  ");
/// ```
pub fn pad(s: &str, width: usize, justify: Justify, fill_char: char) -> String {
    let current = measure_text_width(s);
    if current >= width {
        return s.to_string();
    }

    let diff = width - current;
    let (left, right) = match justify {
        Justify::Left => (0, diff),
        Justify::Right => (diff, 0),
        Justify::Center => (diff / 2, diff - diff / 2),
    };

    let mut out = String::with_capacity(s.len() + diff);
    out.push_str(&fill(fill_char, left));
    out.push_str(s);
    out.push_str(&fill(fill_char, right));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_width_ascii() {
        assert_eq!(display_width("hello"), 5);
        assert_eq!(display_width(""), 0);
    }

    #[test]
    fn display_width_wide_and_combining() {
        assert_eq!(display_width("日本語"), 6);
        // e + combining acute accent
        assert_eq!(display_width("e\u{301}"), 1);
    }

    #[test]
    fn clip_fits_unchanged() {
        assert_eq!(clip_to_width("hello", 5), "hello");
        assert_eq!(clip_to_width("hello", 10), "hello");
    }

    #[test]
    fn clip_ascii() {
        assert_eq!(clip_to_width("hello world", 7), "hello w");
        assert_eq!(clip_to_width("hello", 0), "");
    }

    #[test]
    fn clip_never_splits_wide_glyph() {
        assert_eq!(clip_to_width("日本語", 5), "日本");
        assert_eq!(clip_to_width("a日本", 2), "a");
    }

    #[test]
    fn clip_keeps_combining_marks() {
        assert_eq!(clip_to_width("e\u{301}xyz", 1), "e\u{301}");
    }

    #[test]
    fn clip_measures_emoji_presentation() {
        // U+2764 is one column alone, two with VS16
        let clipped = clip_to_width("\u{2764}\u{FE0F}x", 2);
        assert_eq!(clipped, "\u{2764}\u{FE0F}");
        assert!(display_width(&clipped) <= 2);
        assert!(display_width(&clip_to_width("\u{2764}\u{FE0F}x", 1)) <= 1);
    }

    #[test]
    fn clip_zwj_sequence_within_budget() {
        let family = "\u{1F469}\u{200D}\u{1F469}\u{200D}\u{1F467}ab";
        for max in 0..8 {
            assert!(display_width(&clip_to_width(family, max)) <= max, "max {max}");
        }
    }

    #[test]
    fn clip_preserves_ansi() {
        let styled = "\x1b[31mhello world\x1b[0m";
        let result = clip_to_width(styled, 5);
        assert!(result.starts_with("\x1b[31m"));
        assert_eq!(display_width(&result), 5);
    }

    #[test]
    fn fill_narrow() {
        assert_eq!(fill(' ', 3), "   ");
        assert_eq!(fill('x', 0), "");
    }

    #[test]
    fn fill_wide_glyph_completed_with_spaces() {
        assert_eq!(fill('日', 4), "日日");
        assert_eq!(fill('日', 3), "日 ");
        assert_eq!(fill('日', 1), " ");
    }

    #[test]
    fn fill_zero_width_glyph_uses_spaces() {
        assert_eq!(fill('\u{301}', 2), "  ");
    }

    #[test]
    fn pad_each_justification() {
        assert_eq!(pad("ab", 6, Justify::Left, ' '), "ab    ");
        assert_eq!(pad("ab", 6, Justify::Right, ' '), "    ab");
        assert_eq!(pad("ab", 6, Justify::Center, ' '), "  ab  ");
        assert_eq!(pad("ab", 5, Justify::Center, '*'), "*ab**");
    }

    #[test]
    fn pad_no_truncation() {
        assert_eq!(pad("hello", 3, Justify::Right, ' '), "hello");
    }

    #[test]
    fn pad_wide_content() {
        assert_eq!(pad("日本", 6, Justify::Left, ' '), "日本  ");
    }
}
