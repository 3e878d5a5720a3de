//! The two browser panels drawn over the canvas.
//!
//! The color browser shows swatches for palette colors 16–255; the glyph
//! browser shows one 256-codepoint page starting at the current codepage.
//! Both are ordinary viewports, so whatever they draw can be picked with
//! the right mouse button.

use tp_term::buffer::FrameBuffer;
use tp_tile::descriptor::ColorSpec;
use tp_tile::error::DrawError;
use tp_tile::layout::{self, Justify};
use tp_tile::palette::ColorPalette;
use tp_tile::viewport::{Field, Viewport};

/// Color browser origin and size.
pub const COLOR_PANEL: (u16, u16, u16, u16) = (0, 0, 77, 9);
/// Glyph browser origin and size.
pub const GLYPH_PANEL: (u16, u16, u16, u16) = (0, 9, 58, 18);

const SWATCH: &str = "██";
const SWATCHES_PER_ROW: u16 = 36;
const FIRST_SWATCH: u8 = 16;

const GLYPHS_PER_ROW: u32 = 16;
const GLYPH_COLUMN: u16 = 6;
const GLYPH_CELL: u16 = 3;
const HEX: &[u8; 16] = b"0123456789ABCDEF";

fn header_color() -> ColorSpec {
    ColorSpec::parse("bold 242 on 0")
}

/// Draw the color browser: a plain border and 240 swatches.
///
/// # Errors
///
/// [`DrawError`] if the panel does not fit the surface or a swatch color
/// cannot be allocated.
pub fn draw_colors(
    panel: &mut Viewport,
    surface: &mut FrameBuffer,
    palette: &mut ColorPalette,
) -> Result<(), DrawError> {
    panel.erase(surface)?;
    panel.draw_border(surface, palette, &ColorSpec::PLAIN, 0)?;
    for (i, color) in (FIRST_SWATCH..=u8::MAX).enumerate() {
        let i = u16::try_from(i).unwrap_or(u16::MAX);
        let field = Field::at((i % SWATCHES_PER_ROW) * 2 + 3, i / SWATCHES_PER_ROW + 1);
        panel.print_text(surface, palette, SWATCH, field, &ColorSpec::fg(color))?;
    }
    Ok(())
}

/// Draw the glyph browser for the page starting at `codepage`.
///
/// Codepoints that are not characters (surrogates, past U+10FFFF) show as
/// blanks.
///
/// # Errors
///
/// As for [`draw_colors`].
pub fn draw_glyphs(
    panel: &mut Viewport,
    surface: &mut FrameBuffer,
    palette: &mut ColorPalette,
    codepage: u32,
) -> Result<(), DrawError> {
    let header = header_color();
    let glyph_color = ColorSpec::fg(7);

    panel.erase(surface)?;
    panel.draw_border(surface, palette, &header, 0)?;

    for offset in 0..GLYPHS_PER_ROW * GLYPHS_PER_ROW {
        let glyph = codepage
            .checked_add(offset)
            .and_then(char::from_u32)
            .map_or_else(|| " ".to_owned(), String::from);
        let (row, col) = (offset / GLYPHS_PER_ROW, offset % GLYPHS_PER_ROW);
        let field = Field::at(GLYPH_COLUMN + narrow(col) * GLYPH_CELL, narrow(row) + 1).width(GLYPH_CELL);
        panel.print_text(surface, palette, &glyph, field, &glyph_color)?;
    }

    for (i, digit) in (0u16..).zip(HEX.iter().map(|&b| char::from(b).to_string())) {
        panel.print_text(surface, palette, &digit, Field::at(2, i + 1), &header)?;
        panel.print_text(surface, palette, &digit, Field::at(GLYPH_COLUMN + i * GLYPH_CELL, 0), &header)?;
    }

    let title = page_title(codepage);
    let (left, _) = layout::padding(
        layout::display_width(&title),
        usize::from(panel.width()),
        Justify::Center,
    );
    let bottom = panel.height().saturating_sub(1);
    panel.print_text(surface, palette, &title, Field::at(narrow(left), bottom), &header)?;
    Ok(())
}

/// `U+2600`-style page label.
#[must_use]
pub fn page_title(codepage: u32) -> String {
    format!("U+{codepage:04X}")
}

fn narrow(value: impl TryInto<u16>) -> u16 {
    value.try_into().unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tp_term::color::CellColor;
    use tp_tile::error::RenderError;

    fn color_panel() -> Viewport {
        let (x, y, w, h) = COLOR_PANEL;
        Viewport::new(x, y, w, h)
    }

    fn glyph_panel() -> Viewport {
        let (x, y, w, h) = GLYPH_PANEL;
        Viewport::new(x, y, w, h)
    }

    // -- Color browser ------------------------------------------------------

    #[test]
    fn swatches_are_laid_out_in_rows_of_36() {
        let mut surface = FrameBuffer::new(80, 30);
        let mut palette = ColorPalette::default();
        let mut panel = color_panel();
        draw_colors(&mut panel, &mut surface, &mut palette).unwrap();

        let (_, first) = panel.live_at(3, 1).unwrap();
        assert_eq!(palette.describe(first).fg, Some(16));
        let (_, second_row) = panel.live_at(3, 2).unwrap();
        assert_eq!(palette.describe(second_row).fg, Some(52));
        let (_, last) = panel.live_at(3 + 23 * 2, 7).unwrap();
        assert_eq!(palette.describe(last).fg, Some(255));
        assert_eq!(surface.get(3, 1).unwrap().fg, CellColor::Ansi256(16));
    }

    #[test]
    fn color_panel_needs_room() {
        let mut surface = FrameBuffer::new(60, 30);
        let mut palette = ColorPalette::default();
        let err = draw_colors(&mut color_panel(), &mut surface, &mut palette).unwrap_err();
        assert_eq!(err, DrawError::Render(RenderError::at(76, 8)));
    }

    // -- Glyph browser ------------------------------------------------------

    #[test]
    fn glyph_grid_starts_at_codepage() {
        let mut surface = FrameBuffer::new(80, 30);
        let mut palette = ColorPalette::default();
        let mut panel = glyph_panel();
        draw_glyphs(&mut panel, &mut surface, &mut palette, 0x2600).unwrap();

        assert_eq!(panel.live_at(6, 10).map(|(g, _)| g), Some("☀"));
        assert_eq!(panel.live_at(9, 10).map(|(g, _)| g), Some("☁"));
        // Row 2 of the page starts at U+2610.
        assert_eq!(panel.live_at(6, 11).map(|(g, _)| g), Some("☐"));
    }

    #[test]
    fn glyph_headers_and_title() {
        let mut surface = FrameBuffer::new(80, 30);
        let mut palette = ColorPalette::default();
        let mut panel = glyph_panel();
        draw_glyphs(&mut panel, &mut surface, &mut palette, 0x2600).unwrap();

        assert_eq!(panel.live_at(2, 10).map(|(g, _)| g), Some("0"));
        assert_eq!(panel.live_at(2, 25).map(|(g, _)| g), Some("F"));
        assert_eq!(panel.live_at(6, 9).map(|(g, _)| g), Some("0"));
        assert_eq!(panel.live_at(51, 9).map(|(g, _)| g), Some("F"));

        let title: String = (26..32)
            .filter_map(|x| panel.live_at(x, 26).map(|(g, _)| g.to_owned()))
            .collect();
        assert_eq!(title, "U+2600");
    }

    #[test]
    fn invalid_codepoints_are_blank() {
        let mut surface = FrameBuffer::new(80, 30);
        let mut palette = ColorPalette::default();
        let mut panel = glyph_panel();
        draw_glyphs(&mut panel, &mut surface, &mut palette, 0xD800).unwrap();
        assert_eq!(panel.live_at(6, 10).map(|(g, _)| g), Some(" "));
    }

    #[test]
    fn page_titles() {
        assert_eq!(page_title(0x2600), "U+2600");
        assert_eq!(page_title(0x100), "U+0100");
        assert_eq!(page_title(0x1F300), "U+1F300");
    }
}
