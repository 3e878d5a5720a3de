//! Viewport: a rectangular region of the terminal surface.
//!
//! A viewport knows its own geometry and draws into a [`FrameBuffer`]:
//! blanking, bordered panels, justified text and the tiled blit of a
//! [`TileDocument`]. Every cell it writes is remembered in its live
//! contents so a later pick gesture can read back what is on screen.
//!
//! Positions passed to drawing methods are relative to the viewport's
//! origin. Writes may land outside the viewport; only writes outside the
//! surface itself fail, with a [`RenderError`] naming the minimum size.
//!
//! # Tiling
//!
//! The blit maps each destination cell independently: the source row is
//! `(dy + scroll_y) mod rows` and the source column `(dx + scroll_x) mod
//! row_len`, so panning never runs out of picture.

use std::collections::HashMap;

use tp_term::buffer::FrameBuffer;
use tp_term::cell::Cell;

use crate::descriptor::ColorSpec;
use crate::document::TileDocument;
use crate::error::{DrawError, RenderError};
use crate::layout::{self, Justify};
use crate::palette::{ColorPalette, Style};

const HORIZONTAL: &str = "━";
const VERTICAL: &str = "┃";
const TOP_LEFT: &str = "┏";
const TOP_RIGHT: &str = "┓";
const BOTTOM_LEFT: &str = "┗";
const BOTTOM_RIGHT: &str = "┛";
const DIVIDER: &str = "│";
const DIVIDER_TOP: &str = "┯";
const DIVIDER_BOTTOM: &str = "┷";

/// How a blit treats rows past the end of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlitMode {
    /// Wrap forever.
    #[default]
    Tile,
    /// Draw one document-height pass, then blank the rest.
    Once,
}

/// Where and how wide a line of text goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Field {
    pub x: u16,
    pub y: u16,
    /// 0 means "to the viewport's right edge".
    pub width: u16,
    pub justify: Justify,
}

impl Field {
    /// Left-justified, running to the right edge without padding.
    #[must_use]
    pub const fn at(x: u16, y: u16) -> Self {
        Self {
            x,
            y,
            width: 0,
            justify: Justify::Left,
        }
    }

    /// Fixed width; the text is padded with spaces to fill it.
    #[must_use]
    pub const fn width(self, width: u16) -> Self {
        Self { width, ..self }
    }

    #[must_use]
    pub const fn right(self) -> Self {
        Self {
            justify: Justify::Right,
            ..self
        }
    }

    #[must_use]
    pub const fn center(self) -> Self {
        Self {
            justify: Justify::Center,
            ..self
        }
    }
}

/// A rectangular drawing region with its own read-back index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    x1: u16,
    y1: u16,
    width: u16,
    height: u16,
    live: HashMap<(u16, u16), (String, Style)>,
}

impl Viewport {
    #[must_use]
    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x1: x,
            y1: y,
            width,
            height,
            live: HashMap::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Geometry
    // -----------------------------------------------------------------------

    #[must_use]
    pub const fn x1(&self) -> u16 {
        self.x1
    }

    #[must_use]
    pub const fn y1(&self) -> u16 {
        self.y1
    }

    /// One past the rightmost column.
    #[must_use]
    pub const fn x2(&self) -> u16 {
        self.x1.saturating_add(self.width)
    }

    /// One past the bottom row.
    #[must_use]
    pub const fn y2(&self) -> u16 {
        self.y1.saturating_add(self.height)
    }

    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Move and resize. Live contents are kept until the next erase.
    pub const fn reshape(&mut self, x: u16, y: u16, width: u16, height: u16) {
        self.x1 = x;
        self.y1 = y;
        self.width = width;
        self.height = height;
    }

    /// Whether the absolute position `(x, y)` lies inside.
    #[must_use]
    pub const fn contains(&self, x: u16, y: u16) -> bool {
        self.x1 <= x && x < self.x2() && self.y1 <= y && y < self.y2()
    }

    /// What this viewport last drew at absolute `(x, y)`.
    #[must_use]
    pub fn live_at(&self, x: u16, y: u16) -> Option<(&str, Style)> {
        self.live
            .get(&(x, y))
            .map(|(grapheme, style)| (grapheme.as_str(), *style))
    }

    // -----------------------------------------------------------------------
    // Drawing
    // -----------------------------------------------------------------------

    /// Blank the whole region and forget what was drawn.
    ///
    /// # Errors
    ///
    /// [`RenderError`] if the region does not fit the surface.
    pub fn erase(&mut self, surface: &mut FrameBuffer) -> Result<(), RenderError> {
        self.live.clear();
        if self.width == 0 || self.height == 0 {
            return Ok(());
        }
        let (right, bottom) = (self.x2() - 1, self.y2() - 1);
        if !surface.in_bounds(right, bottom) {
            return Err(RenderError::at(right, bottom));
        }
        surface.fill_rect(self.x1, self.y1, self.width, self.height, Cell::EMPTY);
        Ok(())
    }

    /// Heavy box-drawing border around the region, with thin vertical
    /// dividers every `divider_spacing` columns when that is non-zero.
    ///
    /// # Errors
    ///
    /// [`DrawError`] if the border leaves the surface or the color cannot
    /// be resolved.
    pub fn draw_border(
        &mut self,
        surface: &mut FrameBuffer,
        palette: &mut ColorPalette,
        color: &ColorSpec,
        divider_spacing: u16,
    ) -> Result<(), DrawError> {
        if self.width < 2 || self.height < 2 {
            return Ok(());
        }
        let style = palette.resolve_spec(color)?;
        let template = palette.cell_template(style);
        let (right, bottom) = (self.width - 1, self.height - 1);

        for x in 1..right {
            self.put(surface, x, 0, HORIZONTAL, style, template)?;
            self.put(surface, x, bottom, HORIZONTAL, style, template)?;
        }
        for y in 1..bottom {
            self.put(surface, 0, y, VERTICAL, style, template)?;
            self.put(surface, right, y, VERTICAL, style, template)?;
        }
        self.put(surface, 0, 0, TOP_LEFT, style, template)?;
        self.put(surface, right, 0, TOP_RIGHT, style, template)?;
        self.put(surface, 0, bottom, BOTTOM_LEFT, style, template)?;
        self.put(surface, right, bottom, BOTTOM_RIGHT, style, template)?;

        if divider_spacing > 0 {
            for x in (divider_spacing..right).step_by(usize::from(divider_spacing)) {
                self.put(surface, x, 0, DIVIDER_TOP, style, template)?;
                for y in 1..bottom {
                    self.put(surface, x, y, DIVIDER, style, template)?;
                }
                self.put(surface, x, bottom, DIVIDER_BOTTOM, style, template)?;
            }
        }
        Ok(())
    }

    /// Print one line of text into `field`. Returns the columns written.
    ///
    /// With a non-zero field width the text is justified inside it and
    /// padded with spaces to exactly that width. A zero width means the
    /// rest of the viewport: left-justified text is then written unpadded,
    /// right and centered text is aligned against the viewport edge.
    ///
    /// # Errors
    ///
    /// [`DrawError`] if a cell leaves the surface or the color cannot be
    /// resolved.
    pub fn print_text(
        &mut self,
        surface: &mut FrameBuffer,
        palette: &mut ColorPalette,
        text: &str,
        field: Field,
        color: &ColorSpec,
    ) -> Result<u16, DrawError> {
        let style = palette.resolve_spec(color)?;
        let template = palette.cell_template(style);

        let padded = field.width > 0 || field.justify != Justify::Left;
        let limit = usize::from(if field.width > 0 {
            field.width
        } else {
            self.width.saturating_sub(field.x)
        });

        let (before, _) = layout::padding(layout::display_width(text), limit, field.justify);
        let glyphs = layout::place(text, limit - before);

        self.pad(surface, field.x, field.y, before, style, template)?;
        let mut col = before;
        for glyph in &glyphs {
            let gx = field.x.saturating_add(to_u16(before + glyph.col));
            let written = self.put(surface, gx, field.y, &glyph.text, style, template)?;
            col = before + glyph.col + usize::from(written);
        }
        if padded {
            let x = field.x.saturating_add(to_u16(col));
            self.pad(surface, x, field.y, limit - col.min(limit), style, template)?;
            col = col.max(limit);
        }

        Ok(to_u16(col))
    }

    /// Draw `doc` across the whole region, starting at document position
    /// `scroll` and wrapping in both directions.
    ///
    /// # Errors
    ///
    /// [`DrawError`] if the region leaves the surface or a cell color
    /// cannot be resolved.
    pub fn blit(
        &mut self,
        surface: &mut FrameBuffer,
        palette: &mut ColorPalette,
        doc: &TileDocument,
        scroll: (i32, i32),
        mode: BlitMode,
    ) -> Result<(), DrawError> {
        let rows = doc.height();
        let pass = match mode {
            BlitMode::Tile => usize::from(self.height),
            BlitMode::Once => rows.min(usize::from(self.height)),
        };

        for dy in 0..self.height {
            let row_len = doc.row_len(i32::from(dy).wrapping_add(scroll.1));
            if usize::from(dy) >= pass || row_len == 0 {
                self.blank_row(surface, dy)?;
                continue;
            }
            let sy = wrap(i32::from(dy).wrapping_add(scroll.1), rows);

            let mut dx = 0u16;
            while dx < self.width {
                let sx = wrap(i32::from(dx).wrapping_add(scroll.0), row_len);
                let Some((grapheme, descriptor)) = doc.cell(sx, sy) else {
                    break;
                };
                let style = palette.resolve(descriptor)?;
                let template = palette.cell_template(style);
                let written = self.put(surface, dx, dy, grapheme, style, template)?;
                dx = dx.saturating_add(written.max(1));
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Cell primitive
    // -----------------------------------------------------------------------

    /// Write one grapheme at viewport-relative `(x, y)` and remember it.
    fn put(
        &mut self,
        surface: &mut FrameBuffer,
        x: u16,
        y: u16,
        grapheme: &str,
        style: Style,
        template: Cell,
    ) -> Result<u16, RenderError> {
        let (ax, ay) = (self.x1.saturating_add(x), self.y1.saturating_add(y));
        if !surface.in_bounds(ax, ay) {
            return Err(RenderError::at(ax, ay));
        }
        let written = surface.put_grapheme(ax, ay, grapheme, template);
        self.live.insert((ax, ay), (grapheme.to_owned(), style));
        // The continuation column shows the same grapheme.
        if written > 1 && ax.saturating_add(1) < self.x2() {
            self.live.insert((ax + 1, ay), (grapheme.to_owned(), style));
        }
        Ok(written)
    }

    fn pad(
        &mut self,
        surface: &mut FrameBuffer,
        x: u16,
        y: u16,
        count: usize,
        style: Style,
        template: Cell,
    ) -> Result<(), RenderError> {
        for i in 0..to_u16(count) {
            self.put(surface, x.saturating_add(i), y, " ", style, template)?;
        }
        Ok(())
    }

    fn blank_row(&mut self, surface: &mut FrameBuffer, y: u16) -> Result<(), RenderError> {
        let ay = self.y1.saturating_add(y);
        if self.width == 0 {
            return Ok(());
        }
        let right = self.x2() - 1;
        if !surface.in_bounds(right, ay) {
            return Err(RenderError::at(right, ay));
        }
        surface.fill_rect(self.x1, ay, self.width, 1, Cell::EMPTY);
        for x in self.x1..self.x2() {
            self.live.remove(&(x, ay));
        }
        Ok(())
    }
}

fn wrap(value: i32, len: usize) -> usize {
    let len = i64::try_from(len).unwrap_or(i64::MAX).max(1);
    usize::try_from(i64::from(value).rem_euclid(len)).unwrap_or(0)
}

fn to_u16(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}
