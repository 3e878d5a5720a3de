// SPDX-License-Identifier: MIT
//
// FrameBuffer: the 2D cell grid that everything paints to.
//
// Every character position on screen is a cell in this buffer. The canvas,
// the browser panels and the status line all paint here, then the diff
// renderer compares this frame against the previous one and emits minimal
// ANSI escape sequences for the changes.
//
// Design:
//
//   - Flat `Vec<Cell>` with row-major indexing. A row's cells are
//     contiguous in memory, so left-to-right iteration (which the renderer
//     does) is a linear scan.
//
//   - Tiles are drawn grapheme by grapheme. A grapheme is a base codepoint
//     plus any number of combining marks; the base lives in the cell and
//     the trailing marks live in a parallel `marks` table that is `None`
//     for the overwhelmingly common single-codepoint case.
//
//   - Wide characters occupy two columns. The first cell holds the
//     codepoint; the second is a continuation cell (ch = 0). Writes clean
//     up any wide character they partially overwrite.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::cell::Cell;

/// Trailing codepoints of a multi-codepoint grapheme.
pub type Marks = Option<Box<str>>;

// ─── FrameBuffer ────────────────────────────────────────────────────────────────

/// A 2D buffer of terminal cells.
///
/// # Examples
///
/// ```
/// use tp_term::buffer::FrameBuffer;
/// use tp_term::cell::Cell;
///
/// let mut buf = FrameBuffer::new(80, 24);
/// assert_eq!(buf.width(), 80);
///
/// buf.put_grapheme(5, 3, "e\u{301}", Cell::EMPTY);
/// assert_eq!(buf.grapheme_at(5, 3).as_deref(), Some("e\u{301}"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
    marks: Vec<Marks>,
}

impl FrameBuffer {
    // ─── Construction ────────────────────────────────────────────────────

    /// Create a buffer filled with empty cells (space, default colors).
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        let size = usize::from(width) * usize::from(height);
        Self {
            width,
            height,
            cells: vec![Cell::EMPTY; size],
            marks: vec![None; size],
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    /// Buffer width in columns.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Buffer height in rows.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Total number of cells (`width × height`).
    #[inline]
    #[must_use]
    pub fn total_cells(&self) -> usize {
        self.cells.len()
    }

    /// Whether `(x, y)` is within the buffer.
    #[inline]
    #[must_use]
    pub const fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    #[inline]
    const fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get a cell reference, or `None` if out of bounds.
    #[inline]
    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if self.in_bounds(x, y) {
            Some(&self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    /// Get a mutable cell reference, or `None` if out of bounds.
    ///
    /// Only the cell's style should be changed through this; the grapheme
    /// side table is left alone.
    #[inline]
    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            Some(&mut self.cells[idx])
        } else {
            None
        }
    }

    /// Combining marks stored for `(x, y)`, if any.
    #[inline]
    #[must_use]
    pub fn marks_at(&self, x: u16, y: u16) -> Option<&str> {
        if self.in_bounds(x, y) {
            self.marks[self.index(x, y)].as_deref()
        } else {
            None
        }
    }

    /// A single row as a slice. Returns `None` if `y` is out of bounds.
    #[inline]
    #[must_use]
    pub fn row(&self, y: u16) -> Option<&[Cell]> {
        if y < self.height {
            let start = self.index(0, y);
            Some(&self.cells[start..start + usize::from(self.width)])
        } else {
            None
        }
    }

    /// The marks of a single row, index-aligned with [`row`](Self::row).
    #[inline]
    #[must_use]
    pub fn marks_row(&self, y: u16) -> Option<&[Marks]> {
        if y < self.height {
            let start = self.index(0, y);
            Some(&self.marks[start..start + usize::from(self.width)])
        } else {
            None
        }
    }

    /// The full grapheme drawn at `(x, y)`.
    ///
    /// `None` for out-of-bounds positions and continuation cells.
    #[must_use]
    pub fn grapheme_at(&self, x: u16, y: u16) -> Option<String> {
        let cell = self.get(x, y)?;
        let base = cell.character()?;
        let mut out = String::from(base);
        if let Some(marks) = self.marks_at(x, y) {
            out.push_str(marks);
        }
        Some(out)
    }

    // ─── Clear & Resize ──────────────────────────────────────────────────

    /// Clear the buffer to empty cells.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
        self.marks.fill(None);
    }

    /// Resize the buffer, clearing all content.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let size = usize::from(width) * usize::from(height);
        self.cells.clear();
        self.cells.resize(size, Cell::EMPTY);
        self.marks.clear();
        self.marks.resize(size, None);
    }

    /// Copy another buffer of the same size into this one, reusing the
    /// allocation. Buffers of different sizes are cloned instead.
    pub fn copy_from(&mut self, other: &Self) {
        if self.width == other.width && self.height == other.height {
            self.cells.copy_from_slice(&other.cells);
            self.marks.clone_from(&other.marks);
        } else {
            self.clone_from(other);
        }
    }

    // ─── Direct Cell Access ──────────────────────────────────────────────

    /// Write a single-codepoint cell.
    ///
    /// Any wide character the write lands on is broken and any stored
    /// marks for the position are dropped. Returns `true` if the position
    /// was in bounds.
    #[inline]
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        self.break_wide_char_at(x, y);
        let idx = self.index(x, y);
        self.cells[idx] = cell;
        self.marks[idx] = None;
        true
    }

    /// Write one grapheme at `(x, y)` styled like `style`.
    ///
    /// The grapheme's first codepoint goes into the cell and the rest into
    /// the marks table. A double-width grapheme also claims `(x + 1, y)` as
    /// a continuation; when that column is off the buffer a space is drawn
    /// instead. Returns the number of columns consumed, 0 when `(x, y)` is
    /// out of bounds or the grapheme is empty.
    pub fn put_grapheme(&mut self, x: u16, y: u16, grapheme: &str, style: Cell) -> u16 {
        if !self.in_bounds(x, y) {
            return 0;
        }
        let mut chars = grapheme.chars();
        let Some(base) = chars.next() else {
            return 0;
        };
        let rest = chars.as_str();
        let wide = grapheme.width() >= 2;

        if wide && x + 1 >= self.width {
            self.set(x, y, style.with_char(' '));
            return 1;
        }

        self.break_wide_char_at(x, y);
        if wide {
            self.break_wide_char_at(x + 1, y);
        }

        let idx = self.index(x, y);
        let cell = style.with_char(base);
        self.cells[idx] = cell;
        self.marks[idx] = if rest.is_empty() { None } else { Some(rest.into()) };

        if wide {
            self.cells[idx + 1] = Cell::continuation_of(cell);
            self.marks[idx + 1] = None;
            2
        } else {
            1
        }
    }

    /// Fill a rectangle with `cell`, clipped to the buffer.
    pub fn fill_rect(&mut self, x: u16, y: u16, width: u16, height: u16, cell: Cell) {
        let x2 = x.saturating_add(width).min(self.width);
        let y2 = y.saturating_add(height).min(self.height);
        if x >= x2 || y >= y2 {
            return;
        }
        for row in y..y2 {
            self.break_wide_char_at(x, row);
            self.break_wide_char_at(x2 - 1, row);
            let start = self.index(x, row);
            let end = self.index(x2, row);
            self.cells[start..end].fill(cell);
            self.marks[start..end].fill(None);
        }
    }

    // ─── Wide Character Cleanup ──────────────────────────────────────────

    /// Break any wide character that touches position `(x, y)`.
    ///
    /// - If `(x, y)` is a continuation cell, the owner at `(x-1)` becomes a
    ///   space.
    /// - If the cell after `(x, y)` is a continuation, it was part of a
    ///   wide char starting here, so the orphaned continuation is cleared.
    fn break_wide_char_at(&mut self, x: u16, y: u16) {
        let idx = self.index(x, y);

        if self.cells[idx].is_continuation() && x > 0 {
            let prev = self.index(x - 1, y);
            self.cells[prev].ch = u32::from(b' ');
            self.marks[prev] = None;
        }

        if x + 1 < self.width {
            let next = self.index(x + 1, y);
            if self.cells[next].is_continuation() {
                self.cells[next] = Cell::EMPTY;
            }
        }
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FrameBuffer({}x{})", self.width, self.height)
    }
}

// ─── Text Width Utilities ───────────────────────────────────────────────────────

/// Display width of a character in terminal columns.
///
/// 0 for control and combining characters, 2 for wide characters.
///
/// ```
/// use tp_term::buffer::char_width;
///
/// assert_eq!(char_width('a'), 1);
/// assert_eq!(char_width('中'), 2);
/// assert_eq!(char_width('\n'), 0);
/// ```
#[inline]
#[must_use]
pub fn char_width(ch: char) -> usize {
    ch.width().unwrap_or(0)
}

/// Display width of a string in terminal columns.
///
/// ```
/// use tp_term::buffer::string_width;
///
/// assert_eq!(string_width("hello"), 5);
/// assert_eq!(string_width("a中b"), 4);
/// ```
#[must_use]
pub fn string_width(s: &str) -> usize {
    s.width()
}

// ─── Tests ──────────────────────────────────────────────────────────────────────
