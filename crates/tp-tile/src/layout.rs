//! Text layout: grapheme walking, display widths and justification.
//!
//! Widths come from `unicode-width`. A grapheme is placed only when it fits
//! completely, so a double-width grapheme that would straddle the end of a
//! field is dropped rather than cut in half.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Horizontal alignment inside a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Justify {
    #[default]
    Left,
    Right,
    Center,
}

/// One grapheme placed on a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placed {
    /// Text to draw. Zero-width graphemes before it are folded in.
    pub text: String,
    /// Column offset from the start of the line.
    pub col: usize,
    /// Columns occupied (1 or 2).
    pub width: usize,
}

/// Display width of `text` in terminal columns.
#[must_use]
pub fn display_width(text: &str) -> usize {
    text.width()
}

/// Lay `text` out left to right within `limit` columns.
///
/// Control graphemes are skipped. Zero-width graphemes are carried into
/// the next printable one. Layout stops at the first grapheme that does
/// not fit.
#[must_use]
pub fn place(text: &str, limit: usize) -> Vec<Placed> {
    let mut placed = Vec::new();
    let mut carry = String::new();
    let mut col = 0;

    for grapheme in text.graphemes(true) {
        if grapheme.chars().any(char::is_control) {
            continue;
        }
        let width = grapheme.width();
        if width == 0 {
            carry.push_str(grapheme);
            continue;
        }
        if col + width > limit {
            break;
        }
        let mut text = std::mem::take(&mut carry);
        text.push_str(grapheme);
        placed.push(Placed { text, col, width });
        col += width;
    }

    placed
}

/// Columns of padding before and after `content_width` in a `field` wide
/// field.
///
/// Center puts the odd column on the right.
#[must_use]
pub const fn padding(content_width: usize, field: usize, justify: Justify) -> (usize, usize) {
    let spare = field.saturating_sub(content_width);
    match justify {
        Justify::Left => (0, spare),
        Justify::Right => (spare, 0),
        Justify::Center => (spare / 2, spare - spare / 2),
    }
}
