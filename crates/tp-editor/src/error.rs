//! Editor errors.
//!
//! Everything a command or a frame can fail with funnels into
//! [`EditorError`]. The dispatch loop turns recoverable errors into a
//! status notice and keeps going; fatal ones end the session.

use thiserror::Error;
use tp_tile::error::{DrawError, PaletteError, RenderError, TileError};

/// Why a pick gesture did not load the brush.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PickFailure {
    /// Release happened somewhere other than the press.
    #[error("cursor moved")]
    CursorMoved,
    /// Nothing was drawn at the release position.
    #[error("no contents there")]
    NoContents,
}

#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Tile(#[from] TileError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Palette(#[from] PaletteError),

    #[error(transparent)]
    Pick(#[from] PickFailure),

    /// Save confirmed with an empty path.
    #[error("no file to save to")]
    NoPath,
}

impl EditorError {
    /// Whether the session cannot continue.
    ///
    /// Only palette exhaustion is: pairs are never released, so every
    /// later frame would fail the same way.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Palette(_))
    }
}

impl From<DrawError> for EditorError {
    fn from(err: DrawError) -> Self {
        match err {
            DrawError::Render(e) => Self::Render(e),
            DrawError::Palette(e) => Self::Palette(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pick_messages() {
        assert_eq!(PickFailure::CursorMoved.to_string(), "cursor moved");
        assert_eq!(
            EditorError::from(PickFailure::NoContents).to_string(),
            "no contents there"
        );
    }

    #[test]
    fn only_palette_errors_are_fatal() {
        assert!(EditorError::from(PaletteError::Exhausted { max: 1 }).is_fatal());
        assert!(!EditorError::from(RenderError::at(1, 1)).is_fatal());
        assert!(!EditorError::from(TileError::OutOfRange { x: -1, y: 0 }).is_fatal());
        assert!(!EditorError::NoPath.is_fatal());
    }

    #[test]
    fn draw_errors_keep_their_kind() {
        let err = EditorError::from(DrawError::from(PaletteError::Exhausted { max: 4 }));
        assert!(matches!(err, EditorError::Palette(_)));
        let err = EditorError::from(DrawError::from(RenderError::at(0, 3)));
        assert!(matches!(err, EditorError::Render(_)));
    }
}
