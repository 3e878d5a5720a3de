// SPDX-License-Identifier: MIT
//
// Frame output: a byte sink and a cell encoder.
//
// A frame is encoded into an in-memory OutputBuffer and written with one
// syscall. CellWriter remembers where the terminal cursor is and which SGR
// state (the "pen") is in effect, so consecutive cells of a tile row with
// the same color cost one byte each.

use std::io::{self, Write};

use crate::ansi;
use crate::cell::{Attr, Cell, UnderlineStyle};
use crate::color::CellColor;

// ─── OutputBuffer ────────────────────────────────────────────────────────────

/// Bytes of one frame, written out in a single call.
#[derive(Debug, Default)]
pub struct OutputBuffer {
    bytes: Vec<u8>,
}

impl OutputBuffer {
    /// An empty buffer sized for a full 80×24 repaint.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bytes: Vec::with_capacity(16 * 1024),
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    /// Append a cell's base codepoint. Anything that is not a scalar value,
    /// and the continuation marker, shows as `?`.
    pub fn push_codepoint(&mut self, cp: u32) {
        let ch = char::from_u32(cp).filter(|&c| c != '\0').unwrap_or('?');
        let mut utf8 = [0u8; 4];
        self.bytes.extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
    }

    #[inline]
    pub fn push_str(&mut self, s: &str) {
        self.bytes.extend_from_slice(s.as_bytes());
    }

    /// Write everything to stdout and empty the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if stdout cannot be written.
    pub fn flush_stdout(&mut self) -> io::Result<()> {
        self.flush_to(&mut io::stdout().lock())
    }

    /// Write everything to `w` and empty the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if `w` fails.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        if self.bytes.is_empty() {
            return Ok(());
        }
        w.write_all(&self.bytes)?;
        w.flush()?;
        self.bytes.clear();
        Ok(())
    }
}

impl Write for OutputBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    // Bytes leave through flush_stdout / flush_to only.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ─── Pen ─────────────────────────────────────────────────────────────────────

/// SGR state the terminal is known to have. `None` colors are unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pen {
    fg: Option<CellColor>,
    bg: Option<CellColor>,
    attrs: Attr,
    underline: UnderlineStyle,
}

impl Pen {
    /// Right after SGR 0: no attributes, colors still to be set.
    const RESET: Self = Self {
        fg: None,
        bg: None,
        attrs: Attr::empty(),
        underline: UnderlineStyle::None,
    };
}

// ─── CellWriter ──────────────────────────────────────────────────────────────

/// Encodes cells, emitting only what differs from the terminal's state.
///
/// A cursor move is emitted unless the cell is where the previous write
/// left the cursor. Attribute changes go through SGR 0 when some attribute
/// has to be switched off, which forgets both colors. A continuation cell
/// right after its owner emits nothing.
#[derive(Debug)]
pub struct CellWriter {
    next: Option<(u16, u16)>,
    pen: Pen,
}

impl CellWriter {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next: None,
            pen: Pen::RESET,
        }
    }

    /// Forget everything, e.g. after the screen was cleared.
    pub const fn reset_state(&mut self) {
        *self = Self::new();
    }

    /// Encode the cell at `(x, y)`. `marks` are the combining codepoints
    /// that follow the base in the same grapheme.
    pub fn render_cell(
        &mut self,
        out: &mut OutputBuffer,
        x: u16,
        y: u16,
        cell: &Cell,
        marks: Option<&str>,
    ) {
        let in_place = self.next == Some((x, y));
        if cell.is_continuation() && in_place {
            self.next = Some((x.saturating_add(1), y));
            return;
        }
        if !in_place {
            ansi::cursor_to(out, x, y).ok();
        }

        self.set_pen(out, cell);
        if cell.is_continuation() {
            // Owner is off-screen or was not redrawn: blank the column.
            out.push_str(" ");
        } else {
            out.push_codepoint(cell.ch);
            if let Some(marks) = marks {
                out.push_str(marks);
            }
        }
        self.next = Some((x.saturating_add(1), y));
    }

    fn set_pen(&mut self, out: &mut OutputBuffer, cell: &Cell) {
        if cell.attrs != self.pen.attrs {
            if !self.pen.attrs.is_empty() {
                ansi::reset(out).ok();
                self.pen = Pen::RESET;
            }
            if !cell.attrs.is_empty() {
                ansi::attrs(out, cell.attrs).ok();
            }
            self.pen.attrs = cell.attrs;
        }
        if cell.underline != self.pen.underline {
            ansi::underline(out, cell.underline).ok();
            self.pen.underline = cell.underline;
        }
        if self.pen.fg != Some(cell.fg) {
            ansi::fg(out, cell.fg).ok();
            self.pen.fg = Some(cell.fg);
        }
        if self.pen.bg != Some(cell.bg) {
            ansi::bg(out, cell.bg).ok();
            self.pen.bg = Some(cell.bg);
        }
    }
}

impl Default for CellWriter {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
