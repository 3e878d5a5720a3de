//! Color pair palette.
//!
//! Cells are styled through numbered (foreground, background) pairs the
//! way a curses screen is. A pair is allocated the first time its color
//! combination is seen and is never released, so a given combination keeps
//! its id for the whole session. Pair 0 is the terminal's default colors
//! and is never allocated.
//!
//! The palette is an ordinary owned value: the editor creates one and
//! passes it to whatever draws.

use std::collections::HashMap;

use tp_term::cell::{Attr, Cell, UnderlineStyle};
use tp_term::color::CellColor;

use crate::descriptor::ColorSpec;
use crate::error::PaletteError;

/// Default upper bound on allocated pairs.
pub const DEFAULT_MAX_PAIRS: u16 = 32767;

/// Slot colors of one pair. `None` is the terminal default.
pub type PairColors = (Option<u8>, Option<u8>);

/// The opaque styling attribute a resolved descriptor turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Style {
    pub pair: u16,
    pub attrs: Attr,
    pub underline: bool,
}

impl Style {
    /// A copy with underline forced on.
    #[must_use]
    pub const fn underlined(self) -> Self {
        Self {
            underline: true,
            ..self
        }
    }
}

/// Pair allocator plus a descriptor cache.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    /// `(fg, bg)` → pair id.
    pairs: HashMap<PairColors, u16>,
    /// Pair id → `(fg, bg)`. Index 0 is the defaults pair.
    contents: Vec<PairColors>,
    /// Descriptor text → resolved style, so tiles are parsed once per word.
    styles: HashMap<String, Style>,
    max_pairs: u16,
}

impl ColorPalette {
    /// An empty palette allowing up to `max_pairs` allocated pairs.
    #[must_use]
    pub fn new(max_pairs: u16) -> Self {
        let mut pairs = HashMap::new();
        pairs.insert((None, None), 0);
        Self {
            pairs,
            contents: vec![(None, None)],
            styles: HashMap::new(),
            max_pairs,
        }
    }

    /// Number of allocated pairs, not counting pair 0.
    #[must_use]
    pub fn allocated(&self) -> usize {
        self.contents.len() - 1
    }

    /// The allocation limit.
    #[must_use]
    pub const fn max_pairs(&self) -> u16 {
        self.max_pairs
    }

    // -----------------------------------------------------------------------
    // Resolution
    // -----------------------------------------------------------------------

    /// Resolve a descriptor string.
    ///
    /// # Errors
    ///
    /// [`PaletteError::Exhausted`] when a new pair is needed and the limit
    /// has been reached.
    pub fn resolve(&mut self, descriptor: &str) -> Result<Style, PaletteError> {
        if let Some(style) = self.styles.get(descriptor) {
            return Ok(*style);
        }
        let style = self.resolve_spec(&ColorSpec::parse(descriptor))?;
        self.styles.insert(descriptor.to_owned(), style);
        Ok(style)
    }

    /// Resolve a structured descriptor.
    ///
    /// # Errors
    ///
    /// [`PaletteError::Exhausted`] when a new pair is needed and the limit
    /// has been reached.
    pub fn resolve_spec(&mut self, spec: &ColorSpec) -> Result<Style, PaletteError> {
        let key = (spec.fg, spec.bg);
        let pair = match self.pairs.get(&key) {
            Some(&pair) => pair,
            None => self.allocate(key)?,
        };
        Ok(Style {
            pair,
            attrs: spec.attrs,
            underline: spec.underline,
        })
    }

    fn allocate(&mut self, key: PairColors) -> Result<u16, PaletteError> {
        let Ok(pair) = u16::try_from(self.contents.len()) else {
            return Err(self.exhausted());
        };
        if pair > self.max_pairs {
            return Err(self.exhausted());
        }
        self.contents.push(key);
        self.pairs.insert(key, pair);
        tracing::debug!(pair, fg = ?key.0, bg = ?key.1, "allocated color pair");
        Ok(pair)
    }

    fn exhausted(&self) -> PaletteError {
        tracing::error!(max = self.max_pairs, "color pairs exhausted");
        PaletteError::Exhausted {
            max: self.max_pairs,
        }
    }

    // -----------------------------------------------------------------------
    // Read-back
    // -----------------------------------------------------------------------

    /// The colors behind a pair id.
    #[must_use]
    pub fn pair_content(&self, pair: u16) -> Option<PairColors> {
        self.contents.get(usize::from(pair)).copied()
    }

    /// Turn a style back into a structured descriptor.
    ///
    /// Unknown pair ids read as the terminal defaults.
    #[must_use]
    pub fn describe(&self, style: Style) -> ColorSpec {
        let (fg, bg) = self.pair_content(style.pair).unwrap_or((None, None));
        ColorSpec {
            fg,
            bg,
            attrs: style.attrs,
            underline: style.underline,
        }
    }

    /// Cell colors for a style.
    #[must_use]
    pub fn cell_colors(&self, style: Style) -> (CellColor, CellColor) {
        let (fg, bg) = self.pair_content(style.pair).unwrap_or((None, None));
        (CellColor::from_index(fg), CellColor::from_index(bg))
    }

    /// A blank cell carrying a style, ready for `FrameBuffer::put_grapheme`.
    #[must_use]
    pub fn cell_template(&self, style: Style) -> Cell {
        let (fg, bg) = self.cell_colors(style);
        Cell::styled(
            ' ',
            fg,
            bg,
            style.attrs,
            UnderlineStyle::from_flag(style.underline),
        )
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PAIRS)
    }
}
