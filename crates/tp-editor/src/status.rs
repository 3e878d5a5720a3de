//! The status line on the bottom row.
//!
//! Right side, in bold: the key accumulator, the cursor and the screen
//! size. Left side: the brush character, foreground, background and
//! attributes, each drawn in its own style, then the current notice.

use tp_term::buffer::FrameBuffer;
use tp_tile::descriptor::ColorSpec;
use tp_tile::error::DrawError;
use tp_tile::palette::ColorPalette;
use tp_tile::viewport::{Field, Viewport};

use crate::brush::Brush;

const CHAR_WIDTH: u16 = 2;
const FG_WIDTH: u16 = 4;
const BG_WIDTH: u16 = 7;
const ATTR_WIDTH: u16 = 15;

/// Where the notice starts when the bar is wide enough for every field.
pub const NOTICE_COLUMN: u16 = 1 + CHAR_WIDTH + FG_WIDTH + BG_WIDTH + ATTR_WIDTH + 2;

/// Everything the status line shows.
#[derive(Debug, Clone, Copy)]
pub struct StatusLine<'a> {
    pub accumulator: &'a str,
    pub cursor: (i32, i32),
    pub screen: (u16, u16),
    pub brush: &'a Brush,
    pub notice: &'a str,
}

impl StatusLine<'_> {
    /// The right-justified part.
    #[must_use]
    pub fn right_text(&self) -> String {
        format!(
            "{:<10} {:2},{:2} / {},{}",
            self.accumulator, self.cursor.0, self.cursor.1, self.screen.0, self.screen.1
        )
    }

    /// Draw into `bar`, a one-row viewport.
    ///
    /// # Errors
    ///
    /// [`DrawError`] if the bar is off the surface or a color cannot be
    /// allocated.
    pub fn draw(
        &self,
        bar: &mut Viewport,
        surface: &mut FrameBuffer,
        palette: &mut ColorPalette,
    ) -> Result<(), DrawError> {
        bar.erase(surface)?;
        let bold = ColorSpec::PLAIN.with_bold(true);
        bar.print_text(surface, palette, &self.right_text(), Field::at(0, 0).right(), &bold)?;

        let brush = self.brush;
        let fields = [
            (brush.ch.clone(), CHAR_WIDTH, ColorSpec::fg(7)),
            (brush.fg_label(), FG_WIDTH, brush.fg_spec()),
            (brush.bg_label(), BG_WIDTH, brush.bg_spec()),
            (brush.attr_label(), ATTR_WIDTH, brush.attr_spec()),
        ];
        let mut x = 1;
        for (text, width, color) in &fields {
            let room = bar.width().saturating_sub(x);
            if room == 0 {
                return Ok(());
            }
            let field = Field::at(x, 0).width((*width).min(room));
            x += bar.print_text(surface, palette, text, field, color)?;
        }
        let x = x + 2;
        if !self.notice.is_empty() && x < bar.width() {
            bar.print_text(surface, palette, self.notice, Field::at(x, 0), &ColorSpec::PLAIN)?;
        }
        Ok(())
    }
}
