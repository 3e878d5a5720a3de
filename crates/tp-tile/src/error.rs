//! Error types for tile documents, the pair palette and drawing.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures of a [`TileDocument`](crate::document::TileDocument).
#[derive(Debug, Error)]
pub enum TileError {
    /// The tile text is malformed. `line` is 1-based.
    #[error("line {line}: {reason}")]
    Format { line: usize, reason: String },

    /// A cell query or mutation outside the tile.
    #[error("({x}, {y}) is outside the tile")]
    OutOfRange { x: i32, y: i32 },

    /// Reading or writing the tile file failed.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Every printable code is already taken by another descriptor.
    #[error("no unused color codes left in the tile palette")]
    CodesExhausted,
}

/// Failures of the [`ColorPalette`](crate::palette::ColorPalette).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PaletteError {
    /// Pair ids cannot be reclaimed, so running out is permanent.
    #[error("color pairs exhausted (limit {max})")]
    Exhausted { max: u16 },
}

/// A write landed outside the terminal surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("need a terminal of at least {need_cols}x{need_rows} (drawing at {x},{y})")]
pub struct RenderError {
    pub x: u16,
    pub y: u16,
    pub need_cols: u16,
    pub need_rows: u16,
}

impl RenderError {
    /// The error for a write at `(x, y)`.
    #[must_use]
    pub const fn at(x: u16, y: u16) -> Self {
        Self {
            x,
            y,
            need_cols: x.saturating_add(1),
            need_rows: y.saturating_add(1),
        }
    }
}

/// Anything that can go wrong while a [`Viewport`](crate::viewport::Viewport) draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DrawError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Palette(#[from] PaletteError),
}
