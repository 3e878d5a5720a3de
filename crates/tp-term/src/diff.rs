// SPDX-License-Identifier: MIT
//
// Differential renderer.
//
// The event loop repaints every tick, so most frames are identical to the
// one on screen: only the status line and a freshly painted cell move.
// Panning the canvas is the exception and rewrites nearly every row.
//
// render() keeps a copy of what the terminal shows. Rows whose cells and
// combining marks both match are skipped whole; in the others each changed
// cell goes through the CellWriter. A frame of a different size, or the
// first one, clears the screen and is sent in full. The bytes are wrapped
// in synchronized-output markers and flushed in one write.

use std::io::{self, Write};

use crate::ansi;
use crate::buffer::FrameBuffer;
use crate::output::{CellWriter, OutputBuffer};

// ─── RenderStats ─────────────────────────────────────────────────────────────

/// What one render pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    pub cells_rendered: usize,
    pub cells_skipped: usize,
    pub bytes_written: usize,
}

impl RenderStats {
    #[inline]
    #[must_use]
    pub const fn total_cells(&self) -> usize {
        self.cells_rendered + self.cells_skipped
    }
}

// ─── DiffRenderer ────────────────────────────────────────────────────────────

/// Turns successive frames into the ANSI bytes that update the screen.
///
/// ```no_run
/// use tp_term::buffer::FrameBuffer;
/// use tp_term::diff::DiffRenderer;
///
/// let mut renderer = DiffRenderer::new();
/// let stats = renderer.render(&FrameBuffer::new(80, 24));
/// renderer.flush().unwrap();
/// assert_eq!(stats.cells_rendered, 80 * 24);
/// ```
#[derive(Default)]
pub struct DiffRenderer {
    out: OutputBuffer,
    writer: CellWriter,
    shown: Option<FrameBuffer>,
}

impl DiffRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode the changes from the frame on screen to `frame`.
    pub fn render(&mut self, frame: &FrameBuffer) -> RenderStats {
        self.out.clear();
        self.writer.reset_state();
        let mut stats = RenderStats::default();

        if frame.total_cells() == 0 {
            self.remember(frame);
            return stats;
        }

        let shown = self
            .shown
            .take()
            .filter(|s| s.width() == frame.width() && s.height() == frame.height());

        ansi::begin_sync(&mut self.out).ok();
        if shown.is_none() {
            ansi::clear_screen(&mut self.out).ok();
        }
        for y in 0..frame.height() {
            let rendered = self.render_row(frame, shown.as_ref(), y);
            stats.cells_rendered += rendered;
            stats.cells_skipped += usize::from(frame.width()) - rendered;
        }
        ansi::reset(&mut self.out).ok();
        ansi::end_sync(&mut self.out).ok();

        stats.bytes_written = self.out.len();
        self.shown = shown;
        self.remember(frame);
        tracing::trace!(?stats, "frame encoded");
        stats
    }

    /// Encode the changed cells of row `y`. Returns how many.
    fn render_row(&mut self, frame: &FrameBuffer, shown: Option<&FrameBuffer>, y: u16) -> usize {
        let row_matches = shown.is_some_and(|s| {
            s.row(y) == frame.row(y) && s.marks_row(y) == frame.marks_row(y)
        });
        if row_matches {
            return 0;
        }

        let mut rendered = 0;
        for x in 0..frame.width() {
            let Some(cell) = frame.get(x, y) else {
                continue;
            };
            let marks = frame.marks_at(x, y);
            let same = shown.is_some_and(|s| s.get(x, y) == Some(cell) && s.marks_at(x, y) == marks);
            if !same {
                self.writer.render_cell(&mut self.out, x, y, cell, marks);
                rendered += 1;
            }
        }
        rendered
    }

    fn remember(&mut self, frame: &FrameBuffer) {
        match &mut self.shown {
            Some(shown) => shown.copy_from(frame),
            None => self.shown = Some(frame.clone()),
        }
    }

    /// The bytes produced by the last [`render`](Self::render).
    #[must_use]
    pub fn output_bytes(&self) -> &[u8] {
        self.out.as_bytes()
    }

    /// Send the last render to stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if stdout cannot be written.
    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush_stdout()
    }

    /// Send the last render to `w`.
    ///
    /// # Errors
    ///
    /// Returns an error if `w` fails.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        self.out.flush_to(w)
    }

    /// Forget the frame on screen; the next render sends everything.
    ///
    /// Used after the external viewer returns and on `^L`.
    pub fn force_redraw(&mut self) {
        self.shown = None;
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
