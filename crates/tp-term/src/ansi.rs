// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that write escape sequences to any `impl Write`. No state,
// no decisions about when to emit; that's the `CellWriter`'s job. This
// module just knows the byte-level encoding of every terminal command the
// painter needs.
//
// All cursor positions are 0-indexed in our API and converted to 1-indexed
// for the terminal.
use std::io::{self, Write};

use crate::cell::{Attr, UnderlineStyle};
use crate::color::CellColor;

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Move the cursor to `(x, y)` (CUP).
#[inline]
pub fn cursor_to(w: &mut impl Write, x: u16, y: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1)
}

/// Hide the cursor (DECTCEM reset).
#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

/// Show the cursor (DECTCEM set).
#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// Clear the entire screen (ED 2).
#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[2J")
}

/// Reset all SGR attributes to terminal defaults (SGR 0).
///
/// Clears colors, attributes and underline alike. The stateful renderer
/// must invalidate its tracked state after calling this.
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[0m")
}

// ─── Colors ──────────────────────────────────────────────────────────────────

/// Set the foreground color.
///
/// Uses the compact codes for the 16 standard colors (30–37, 90–97) and
/// the extended form `38;5;N` for the rest of the palette.
pub fn fg(w: &mut impl Write, color: CellColor) -> io::Result<()> {
    match color {
        CellColor::Default => w.write_all(b"\x1b[39m"),
        CellColor::Ansi256(idx) if idx < 8 => write!(w, "\x1b[{}m", 30 + u16::from(idx)),
        CellColor::Ansi256(idx) if idx < 16 => write!(w, "\x1b[{}m", 82 + u16::from(idx)),
        CellColor::Ansi256(idx) => write!(w, "\x1b[38;5;{idx}m"),
    }
}

/// Set the background color (40–47, 100–107, `48;5;N`).
pub fn bg(w: &mut impl Write, color: CellColor) -> io::Result<()> {
    match color {
        CellColor::Default => w.write_all(b"\x1b[49m"),
        CellColor::Ansi256(idx) if idx < 8 => write!(w, "\x1b[{}m", 40 + u16::from(idx)),
        CellColor::Ansi256(idx) if idx < 16 => write!(w, "\x1b[{}m", 92 + u16::from(idx)),
        CellColor::Ansi256(idx) => write!(w, "\x1b[48;5;{idx}m"),
    }
}

// ─── Text Attributes ─────────────────────────────────────────────────────────

/// Emit SGR codes for text attributes as a single CSI sequence.
///
/// Multiple attributes are semicolon-separated: `\x1b[1;7m` for bold +
/// reverse. Does nothing if no attributes are set.
pub fn attrs(w: &mut impl Write, attr: Attr) -> io::Result<()> {
    const CODES: [(Attr, &[u8]); 5] = [
        (Attr::BOLD, b"1"),
        (Attr::DIM, b"2"),
        (Attr::ITALIC, b"3"),
        (Attr::BLINK, b"5"),
        (Attr::REVERSE, b"7"),
    ];

    if attr.is_empty() {
        return Ok(());
    }

    w.write_all(b"\x1b[")?;
    let mut first = true;
    for (flag, code) in CODES {
        if attr.contains(flag) {
            if !first {
                w.write_all(b";")?;
            }
            w.write_all(code)?;
            first = false;
        }
    }
    w.write_all(b"m")
}

/// Turn underline on (SGR 4) or off (SGR 24).
pub fn underline(w: &mut impl Write, style: UnderlineStyle) -> io::Result<()> {
    match style {
        UnderlineStyle::None => w.write_all(b"\x1b[24m"),
        UnderlineStyle::Straight => w.write_all(b"\x1b[4m"),
    }
}

/// Emit a complete style from scratch: reset, attributes, underline,
/// then both colors.
///
/// Used for standalone output (tile snapshots) where no prior terminal
/// state can be assumed.
pub fn style(
    w: &mut impl Write,
    fg_color: CellColor,
    bg_color: CellColor,
    attr: Attr,
    under: UnderlineStyle,
) -> io::Result<()> {
    reset(w)?;
    attrs(w, attr)?;
    if under.is_underlined() {
        underline(w, under)?;
    }
    if !fg_color.is_default() {
        fg(w, fg_color)?;
    }
    if !bg_color.is_default() {
        bg(w, bg_color)?;
    }
    Ok(())
}

// ─── Synchronized Output ─────────────────────────────────────────────────────

/// Begin synchronized output (DEC Private Mode 2026).
///
/// The terminal buffers everything until [`end_sync`], so a frame never
/// shows half-drawn.
#[inline]
pub fn begin_sync(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?2026h")
}

/// End synchronized output.
#[inline]
pub fn end_sync(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?2026l")
}

// ─── Alternate Screen ───────────────────────────────────────────────────────

/// Enter the alternate screen buffer (DEC Private Mode 1049).
#[inline]
pub fn enter_alt_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049h")
}

/// Exit the alternate screen buffer and restore original content.
#[inline]
pub fn exit_alt_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049l")
}

// ─── Mouse Protocol ─────────────────────────────────────────────────────────

/// Enable button-event mouse reporting in SGR format (DEC 1000 + 1006).
///
/// Presses and releases are reported with the button that changed; motion
/// is not.
pub fn enable_mouse(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1000h")?;
    w.write_all(b"\x1b[?1006h")
}

/// Disable mouse reporting.
pub fn disable_mouse(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1006l")?;
    w.write_all(b"\x1b[?1000l")
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: run an ANSI function and return its output as a string.
    fn emit<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    // ── Cursor ──────────────────────────────────────────────────────────

    #[test]
    fn cursor_to_is_one_based() {
        assert_eq!(emit(|w| cursor_to(w, 0, 0)), "\x1b[1;1H");
        assert_eq!(emit(|w| cursor_to(w, 10, 20)), "\x1b[21;11H");
    }

    #[test]
    fn cursor_to_does_not_overflow() {
        assert_eq!(emit(|w| cursor_to(w, u16::MAX, 0)), "\x1b[1;65536H");
    }

    #[test]
    fn cursor_visibility() {
        assert_eq!(emit(|w| cursor_hide(w)), "\x1b[?25l");
        assert_eq!(emit(|w| cursor_show(w)), "\x1b[?25h");
    }

    // ── Colors ──────────────────────────────────────────────────────────

    #[test]
    fn fg_encodings() {
        assert_eq!(emit(|w| fg(w, CellColor::Default)), "\x1b[39m");
        assert_eq!(emit(|w| fg(w, CellColor::Ansi256(0))), "\x1b[30m");
        assert_eq!(emit(|w| fg(w, CellColor::Ansi256(7))), "\x1b[37m");
        assert_eq!(emit(|w| fg(w, CellColor::Ansi256(8))), "\x1b[90m");
        assert_eq!(emit(|w| fg(w, CellColor::Ansi256(15))), "\x1b[97m");
        assert_eq!(emit(|w| fg(w, CellColor::Ansi256(16))), "\x1b[38;5;16m");
        assert_eq!(emit(|w| fg(w, CellColor::Ansi256(255))), "\x1b[38;5;255m");
    }

    #[test]
    fn bg_encodings() {
        assert_eq!(emit(|w| bg(w, CellColor::Default)), "\x1b[49m");
        assert_eq!(emit(|w| bg(w, CellColor::Ansi256(2))), "\x1b[42m");
        assert_eq!(emit(|w| bg(w, CellColor::Ansi256(8))), "\x1b[100m");
        assert_eq!(emit(|w| bg(w, CellColor::Ansi256(15))), "\x1b[107m");
        assert_eq!(emit(|w| bg(w, CellColor::Ansi256(200))), "\x1b[48;5;200m");
    }

    // ── Attributes ──────────────────────────────────────────────────────

    #[test]
    fn attrs_empty_emits_nothing() {
        assert_eq!(emit(|w| attrs(w, Attr::empty())), "");
    }

    #[test]
    fn attrs_single_and_combined() {
        assert_eq!(emit(|w| attrs(w, Attr::BOLD)), "\x1b[1m");
        assert_eq!(emit(|w| attrs(w, Attr::BOLD | Attr::REVERSE)), "\x1b[1;7m");
        assert_eq!(emit(|w| attrs(w, Attr::all())), "\x1b[1;2;3;5;7m");
    }

    #[test]
    fn underline_on_off() {
        assert_eq!(emit(|w| underline(w, UnderlineStyle::Straight)), "\x1b[4m");
        assert_eq!(emit(|w| underline(w, UnderlineStyle::None)), "\x1b[24m");
    }

    #[test]
    fn full_style_starts_with_reset() {
        let s = emit(|w| {
            style(
                w,
                CellColor::Ansi256(7),
                CellColor::Ansi256(0),
                Attr::BOLD,
                UnderlineStyle::Straight,
            )
        });
        assert_eq!(s, "\x1b[0m\x1b[1m\x1b[4m\x1b[37m\x1b[40m");
    }

    #[test]
    fn full_style_skips_default_colors() {
        let s = emit(|w| {
            style(
                w,
                CellColor::Default,
                CellColor::Default,
                Attr::empty(),
                UnderlineStyle::None,
            )
        });
        assert_eq!(s, "\x1b[0m");
    }

    // ── Modes ───────────────────────────────────────────────────────────

    #[test]
    fn sync_markers() {
        assert_eq!(emit(|w| begin_sync(w)), "\x1b[?2026h");
        assert_eq!(emit(|w| end_sync(w)), "\x1b[?2026l");
    }

    #[test]
    fn alt_screen() {
        assert_eq!(emit(|w| enter_alt_screen(w)), "\x1b[?1049h");
        assert_eq!(emit(|w| exit_alt_screen(w)), "\x1b[?1049l");
    }

    #[test]
    fn mouse_reporting() {
        assert_eq!(emit(|w| enable_mouse(w)), "\x1b[?1000h\x1b[?1006h");
        assert_eq!(emit(|w| disable_mouse(w)), "\x1b[?1006l\x1b[?1000l");
    }

    #[test]
    fn sequences_compose() {
        let mut buf = Vec::new();
        cursor_to(&mut buf, 5, 3).unwrap();
        fg(&mut buf, CellColor::Ansi256(196)).unwrap();
        bg(&mut buf, CellColor::Ansi256(0)).unwrap();
        attrs(&mut buf, Attr::BOLD).unwrap();
        let s = String::from_utf8(buf).unwrap();
        assert_eq!(s, "\x1b[4;6H\x1b[38;5;196m\x1b[40m\x1b[1m");
    }
}
