// SPDX-License-Identifier: MIT
//
// Cell: one character position on screen.
//
// A cell holds a Unicode codepoint, foreground and background colors,
// text attributes and an underline style. Graphemes that need more than
// one codepoint (a base plus combining marks) keep the base here and the
// trailing marks in the frame buffer's side table, so the cell itself
// stays small and `Copy`.
//
// Wide characters (CJK, most emoji) occupy two columns. The first cell
// holds the codepoint; the second is a continuation cell (ch = 0). The
// renderer skips continuation cells when outputting characters but still
// applies their colors for correct background fill.

use crate::color::CellColor;

// ─── Text Attributes ─────────────────────────────────────────────────────────

bitflags::bitflags! {
    /// Text attributes stored as a compact bitfield.
    ///
    /// These map directly to SGR parameters and to the attribute words of
    /// a color descriptor (`bold`, `dim`, `italic`, `blink`, `reverse`):
    ///
    /// ```
    /// use tp_term::cell::Attr;
    ///
    /// let style = Attr::BOLD | Attr::REVERSE;
    /// assert!(style.contains(Attr::BOLD));
    /// assert!(!style.contains(Attr::DIM));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Attr: u8 {
        /// SGR 1: increased intensity.
        const BOLD    = 1 << 0;
        /// SGR 2: decreased intensity.
        const DIM     = 1 << 1;
        /// SGR 3: italic.
        const ITALIC  = 1 << 2;
        /// SGR 5: slow blink.
        const BLINK   = 1 << 3;
        /// SGR 7: swap foreground and background.
        const REVERSE = 1 << 4;
    }
}

// ─── Underline Style ─────────────────────────────────────────────────────────

/// Underline style for a cell.
///
/// Kept apart from [`Attr`] so the renderer can track underline changes
/// independently of the SGR 0 reset that attribute changes require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[repr(u8)]
pub enum UnderlineStyle {
    /// No underline.
    #[default]
    None = 0,
    /// SGR 4: single straight underline.
    Straight = 1,
}

impl UnderlineStyle {
    /// Whether any underline is active.
    #[inline]
    #[must_use]
    pub const fn is_underlined(self) -> bool {
        !matches!(self, Self::None)
    }

    /// `Straight` when `on`, otherwise `None`.
    #[inline]
    #[must_use]
    pub const fn from_flag(on: bool) -> Self {
        if on { Self::Straight } else { Self::None }
    }
}

// ─── Cell ────────────────────────────────────────────────────────────────────

/// A single terminal cell.
///
/// # Layout (12 bytes)
///
/// ```text
/// ┌──────────┬──────────┬──────────┬───────┬───────────┬─────────┐
/// │ ch: u32  │ fg: Cell │ bg: Cell │ attrs │ underline │ padding │
/// │ 4 bytes  │  Color   │  Color   │  u8   │    u8     │         │
/// └──────────┴──────────┴──────────┴───────┴───────────┴─────────┘
/// ```
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Unicode codepoint to display.
    ///
    /// - `0` = continuation cell (second column of a wide character)
    /// - `b' '` (32) = empty / space (the default)
    pub ch: u32,

    /// Foreground (text) color.
    pub fg: CellColor,

    /// Background color.
    pub bg: CellColor,

    /// Text attributes.
    pub attrs: Attr,

    /// Underline style. `None` means no underline.
    pub underline: UnderlineStyle,
}

/// Continuation marker: a cell whose `ch` is 0 belongs to the preceding
/// wide character and produces no character output.
const CONTINUATION: u32 = 0;

/// Default character for empty cells.
const SPACE: u32 = b' ' as u32;

impl Cell {
    /// An empty cell: space character, default colors, no attributes.
    pub const EMPTY: Self = Self {
        ch: SPACE,
        fg: CellColor::Default,
        bg: CellColor::Default,
        attrs: Attr::empty(),
        underline: UnderlineStyle::None,
    };

    /// Create a cell with a character and default styling.
    #[inline]
    #[must_use]
    pub const fn new(ch: char) -> Self {
        Self {
            ch: ch as u32,
            ..Self::EMPTY
        }
    }

    /// Create a cell with full styling.
    #[inline]
    #[must_use]
    pub const fn styled(
        ch: char,
        fg: CellColor,
        bg: CellColor,
        attrs: Attr,
        underline: UnderlineStyle,
    ) -> Self {
        Self {
            ch: ch as u32,
            fg,
            bg,
            attrs,
            underline,
        }
    }

    /// Create a continuation cell for the second column of `owner`.
    ///
    /// Inherits the owner's colors so the background fills both columns.
    #[inline]
    #[must_use]
    pub const fn continuation_of(owner: Self) -> Self {
        Self {
            ch: CONTINUATION,
            underline: UnderlineStyle::None,
            ..owner
        }
    }

    // ─── Queries ──────────────────────────────────────────────────────────

    /// Whether this is a continuation cell.
    #[inline]
    #[must_use]
    pub const fn is_continuation(self) -> bool {
        self.ch == CONTINUATION
    }

    /// Whether this cell is visually empty (space, default colors, no styling).
    #[inline]
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.ch == SPACE
            && self.fg.is_default()
            && self.bg.is_default()
            && self.attrs.is_empty()
            && !self.underline.is_underlined()
    }

    /// The codepoint as a `char`. `None` for continuation cells.
    #[inline]
    #[must_use]
    pub const fn character(self) -> Option<char> {
        if self.ch == CONTINUATION {
            return None;
        }
        char::from_u32(self.ch)
    }

    // ─── Builders ─────────────────────────────────────────────────────────

    /// Replace the character, keeping the styling.
    #[inline]
    #[must_use]
    pub const fn with_char(self, ch: char) -> Self {
        Self { ch: ch as u32, ..self }
    }

    /// Set the foreground color.
    #[inline]
    #[must_use]
    pub const fn with_fg(self, fg: CellColor) -> Self {
        Self { fg, ..self }
    }

    /// Set the background color.
    #[inline]
    #[must_use]
    pub const fn with_bg(self, bg: CellColor) -> Self {
        Self { bg, ..self }
    }

    /// Set text attributes.
    #[inline]
    #[must_use]
    pub const fn with_attrs(self, attrs: Attr) -> Self {
        Self { attrs, ..self }
    }

    /// Set underline style.
    #[inline]
    #[must_use]
    pub const fn with_underline(self, underline: UnderlineStyle) -> Self {
        Self { underline, ..self }
    }

    /// Whether two cells share colors, attributes and underline.
    #[inline]
    #[must_use]
    pub fn same_style(self, other: &Self) -> bool {
        self.fg == other.fg
            && self.bg == other.bg
            && self.attrs == other.attrs
            && self.underline == other.underline
    }
}

impl Default for Cell {
    #[inline]
    fn default() -> Self {
        Self::EMPTY
    }
}

impl std::fmt::Debug for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_continuation() {
            return write!(f, "Cell(continuation)");
        }
        let ch = char::from_u32(self.ch).unwrap_or('?');
        write!(f, "Cell({ch:?}")?;
        if !self.fg.is_default() {
            write!(f, ", fg={:?}", self.fg)?;
        }
        if !self.bg.is_default() {
            write!(f, ", bg={:?}", self.bg)?;
        }
        if !self.attrs.is_empty() {
            write!(f, ", {:?}", self.attrs)?;
        }
        if self.underline.is_underlined() {
            write!(f, ", {:?}", self.underline)?;
        }
        write!(f, ")")
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
