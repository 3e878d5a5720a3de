// SPDX-License-Identifier: MIT
//
// Terminal input parser.
//
// Turns raw stdin bytes into keys and mouse reports. Understands what a
// plain xterm-compatible terminal sends once SGR mouse reporting is on:
//
// - control bytes and printable ASCII / UTF-8
// - legacy CSI sequences (arrows, editing keys, function keys) with
//   xterm modifier parameters
// - SS3 sequences (arrows and F1-F4 in application mode)
// - SGR mouse reports (press / release / drag / move / wheel)
// - Alt+key as ESC followed by the key
//
// Escape sequences can span several `read()` calls, so the parser keeps a
// small byte buffer. A lone ESC stays pending until the caller flushes it
// after a quiet tick, at which point it becomes a real Escape key.

use bitflags::bitflags;

// ─── Event Types ────────────────────────────────────────────────────────────

/// A parsed terminal input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key press.
    Key(KeyEvent),
    /// A mouse report.
    Mouse(MouseEvent),
}

/// A key press with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Which key was pressed.
    pub code: KeyCode,
    /// Active modifier keys.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// A key with no modifiers.
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
        }
    }

    /// A key with the given modifiers.
    #[must_use]
    pub const fn with(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }
}

/// Identity of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A Unicode character.
    Char(char),
    Enter,
    Tab,
    Backspace,
    Escape,
    Delete,
    Insert,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    /// F1 through F20.
    F(u8),
}

bitflags! {
    /// Keyboard modifier flags, in xterm's `param = 1 + bitmask` encoding.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const CTRL  = 0b0000_0100;
    }
}

/// A mouse report: what happened, where, with which modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    /// Press, release, drag, move or wheel.
    pub kind: MouseEventKind,
    /// 0-indexed column.
    pub x: u16,
    /// 0-indexed row.
    pub y: u16,
    /// Active modifier keys.
    pub modifiers: Modifiers,
}

/// Mouse event classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEventKind {
    Press(MouseButton),
    Release(MouseButton),
    Drag(MouseButton),
    Move,
    ScrollUp,
    ScrollDown,
    ScrollLeft,
    ScrollRight,
}

/// Mouse button identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

impl MouseButton {
    /// Conventional 1-based button number (left = 1, middle = 2, right = 3).
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::Left => 1,
            Self::Middle => 2,
            Self::Right => 3,
        }
    }
}

// ─── Parser ─────────────────────────────────────────────────────────────────

/// Terminal input parser.
///
/// Feed raw bytes via [`advance`](Parser::advance); incomplete sequences are
/// buffered until more bytes arrive or [`flush`](Parser::flush) is called.
pub struct Parser {
    buf: Vec<u8>,
}

impl Parser {
    /// Create a parser with an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(64),
        }
    }

    /// Feed raw bytes and return every event that can be parsed so far.
    pub fn advance(&mut self, data: &[u8]) -> Vec<Event> {
        self.buf.extend_from_slice(data);
        let mut events = Vec::new();
        let mut pos = 0;

        while pos < self.buf.len() {
            match try_parse(&self.buf[pos..]) {
                Parsed::Event(event, consumed) => {
                    events.push(event);
                    pos += consumed;
                }
                Parsed::Incomplete => break,
                Parsed::Skip(n) => {
                    tracing::trace!(bytes = ?&self.buf[pos..pos + n], "skipped input");
                    pos += n;
                }
            }
        }

        self.buf.drain(..pos);
        events
    }

    /// Whether unconsumed bytes are waiting for more input.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.buf.is_empty()
    }

    /// Resolve pending bytes as literal keys.
    ///
    /// A lone ESC becomes the Escape key; an ESC followed by an unfinished
    /// sequence becomes Escape plus the literal bytes.
    pub fn flush(&mut self) -> Vec<Event> {
        let events = self
            .buf
            .iter()
            .filter_map(|&byte| match byte {
                0x1B => Some(KeyEvent::plain(KeyCode::Escape)),
                0x7F => Some(KeyEvent::plain(KeyCode::Backspace)),
                0x00 => Some(KeyEvent::with(KeyCode::Char('@'), Modifiers::CTRL)),
                b @ 0x01..=0x1A => Some(KeyEvent::with(
                    KeyCode::Char(char::from(b + b'a' - 1)),
                    Modifiers::CTRL,
                )),
                b @ 0x20..=0x7E => Some(KeyEvent::plain(KeyCode::Char(char::from(b)))),
                _ => None,
            })
            .map(Event::Key)
            .collect();
        self.buf.clear();
        events
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Stateless Parsing Functions ────────────────────────────────────────────

enum Parsed {
    /// An event and the number of bytes it used.
    Event(Event, usize),
    /// Need more bytes.
    Incomplete,
    /// Unrecognized bytes to drop.
    Skip(usize),
}

fn try_parse(buf: &[u8]) -> Parsed {
    let Some(&lead) = buf.first() else {
        return Parsed::Skip(0);
    };

    match lead {
        0x1B => parse_escape(buf),
        0x00 => Parsed::Event(key(KeyCode::Char('@'), Modifiers::CTRL), 1),
        0x08 | 0x7F => Parsed::Event(key(KeyCode::Backspace, Modifiers::empty()), 1),
        0x09 => Parsed::Event(key(KeyCode::Tab, Modifiers::empty()), 1),
        0x0A | 0x0D => Parsed::Event(key(KeyCode::Enter, Modifiers::empty()), 1),
        b @ 0x01..=0x1A => Parsed::Event(ctrl_letter(b, Modifiers::empty()), 1),
        b @ 0x20..=0x7E => Parsed::Event(key(KeyCode::Char(char::from(b)), Modifiers::empty()), 1),
        0xC0..=0xFF => parse_utf8(buf),
        _ => Parsed::Skip(1),
    }
}

fn parse_escape(buf: &[u8]) -> Parsed {
    let Some(&next) = buf.get(1) else {
        return Parsed::Incomplete;
    };

    match next {
        b'[' => parse_csi(buf),
        b'O' => parse_ss3(buf),
        0x1B => Parsed::Event(key(KeyCode::Escape, Modifiers::ALT), 2),
        b @ 0x20..=0x7E => Parsed::Event(key(KeyCode::Char(char::from(b)), Modifiers::ALT), 2),
        b @ 0x01..=0x1A if !matches!(b, 0x09 | 0x0A | 0x0D) => {
            Parsed::Event(ctrl_letter(b, Modifiers::ALT), 2)
        }
        _ => Parsed::Event(key(KeyCode::Escape, Modifiers::empty()), 1),
    }
}

/// Tilde-terminated key numbers (`CSI n ~`).
const TILDE_KEYS: &[(u16, KeyCode)] = &[
    (1, KeyCode::Home),
    (2, KeyCode::Insert),
    (3, KeyCode::Delete),
    (4, KeyCode::End),
    (5, KeyCode::PageUp),
    (6, KeyCode::PageDown),
    (7, KeyCode::Home),
    (8, KeyCode::End),
    (11, KeyCode::F(1)),
    (12, KeyCode::F(2)),
    (13, KeyCode::F(3)),
    (14, KeyCode::F(4)),
    (15, KeyCode::F(5)),
    (17, KeyCode::F(6)),
    (18, KeyCode::F(7)),
    (19, KeyCode::F(8)),
    (20, KeyCode::F(9)),
    (21, KeyCode::F(10)),
    (23, KeyCode::F(11)),
    (24, KeyCode::F(12)),
];

fn parse_csi(buf: &[u8]) -> Parsed {
    let Some(&third) = buf.get(2) else {
        return Parsed::Incomplete;
    };
    if third == b'<' {
        return parse_sgr_mouse(buf);
    }

    // Parameter and intermediate bytes run until a final byte in 0x40..=0x7E.
    let mut end = 2;
    while let Some(&b) = buf.get(end) {
        if (0x40..=0x7E).contains(&b) {
            break;
        }
        if !(0x20..=0x3F).contains(&b) {
            return Parsed::Skip(end + 1);
        }
        end += 1;
    }
    let Some(&final_byte) = buf.get(end) else {
        return Parsed::Incomplete;
    };

    let params = parse_params(&buf[2..end]);
    let consumed = end + 1;
    let modifiers = params.get(1).map_or(Modifiers::empty(), |&p| decode_modifiers(p));

    let code = match final_byte {
        b'~' => {
            let first = params.first().copied().unwrap_or(0);
            match TILDE_KEYS.iter().find(|(n, _)| *n == first) {
                Some(&(_, code)) => code,
                None => return Parsed::Skip(consumed),
            }
        }
        b'Z' => return Parsed::Event(key(KeyCode::Tab, Modifiers::SHIFT), consumed),
        other => match cursor_key(other) {
            Some(code) => code,
            None => return Parsed::Skip(consumed),
        },
    };

    Parsed::Event(key(code, modifiers), consumed)
}

fn parse_ss3(buf: &[u8]) -> Parsed {
    let Some(&b) = buf.get(2) else {
        return Parsed::Incomplete;
    };
    cursor_key(b).map_or(Parsed::Skip(3), |code| {
        Parsed::Event(key(code, Modifiers::empty()), 3)
    })
}

/// Final bytes shared by CSI and SS3 cursor/function keys.
const fn cursor_key(b: u8) -> Option<KeyCode> {
    Some(match b {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        b'P' => KeyCode::F(1),
        b'Q' => KeyCode::F(2),
        b'R' => KeyCode::F(3),
        b'S' => KeyCode::F(4),
        _ => return None,
    })
}

/// `ESC [ < Cb ; Cx ; Cy (M|m)`: `M` for press and motion, `m` for release.
fn parse_sgr_mouse(buf: &[u8]) -> Parsed {
    let start = 3;
    let mut end = start;
    while let Some(&b) = buf.get(end) {
        if b == b'M' || b == b'm' {
            break;
        }
        if !b.is_ascii_digit() && b != b';' {
            return Parsed::Skip(end + 1);
        }
        end += 1;
    }
    let Some(&final_byte) = buf.get(end) else {
        return Parsed::Incomplete;
    };

    let params = parse_params(&buf[start..end]);
    let [cb, raw_x, raw_y] = [0, 1, 2].map(|i| params.get(i).copied().unwrap_or(0));

    let mut modifiers = Modifiers::empty();
    if cb & 4 != 0 {
        modifiers |= Modifiers::SHIFT;
    }
    if cb & 8 != 0 {
        modifiers |= Modifiers::ALT;
    }
    if cb & 16 != 0 {
        modifiers |= Modifiers::CTRL;
    }

    let base = cb & 3;
    let kind = if cb & 64 != 0 {
        match base {
            0 => MouseEventKind::ScrollUp,
            1 => MouseEventKind::ScrollDown,
            2 => MouseEventKind::ScrollLeft,
            _ => MouseEventKind::ScrollRight,
        }
    } else if cb & 32 != 0 {
        decode_mouse_button(base).map_or(MouseEventKind::Move, MouseEventKind::Drag)
    } else if final_byte == b'm' {
        MouseEventKind::Release(decode_mouse_button(base).unwrap_or(MouseButton::Left))
    } else {
        match decode_mouse_button(base) {
            Some(button) => MouseEventKind::Press(button),
            None => MouseEventKind::Move,
        }
    };

    Parsed::Event(
        Event::Mouse(MouseEvent {
            kind,
            x: raw_x.saturating_sub(1),
            y: raw_y.saturating_sub(1),
            modifiers,
        }),
        end + 1,
    )
}

fn parse_utf8(buf: &[u8]) -> Parsed {
    let expected = utf8_char_len(buf[0]);
    if expected == 0 {
        return Parsed::Skip(1);
    }
    if buf.len() < expected {
        return Parsed::Incomplete;
    }
    match std::str::from_utf8(&buf[..expected]).ok().and_then(|s| s.chars().next()) {
        Some(ch) => Parsed::Event(key(KeyCode::Char(ch), Modifiers::empty()), expected),
        None => Parsed::Skip(1),
    }
}

// ─── Helpers ────────────────────────────────────────────────────────────────

const fn key(code: KeyCode, modifiers: Modifiers) -> Event {
    Event::Key(KeyEvent { code, modifiers })
}

/// Ctrl+letter from its C0 control byte (0x01 = Ctrl+A).
fn ctrl_letter(byte: u8, extra: Modifiers) -> Event {
    key(
        KeyCode::Char(char::from(byte + b'a' - 1)),
        Modifiers::CTRL | extra,
    )
}

/// Semicolon-separated decimal parameters. Empty slots read as 0.
fn parse_params(raw: &[u8]) -> Vec<u16> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(|&b| b == b';')
        .map(|part| {
            part.iter()
                .take_while(|b| b.is_ascii_digit())
                .fold(0u16, |acc, &b| {
                    acc.saturating_mul(10).saturating_add(u16::from(b - b'0'))
                })
        })
        .collect()
}

/// Decode the xterm modifier parameter (`1 + bitmask`).
#[allow(clippy::cast_possible_truncation)]
const fn decode_modifiers(param: u16) -> Modifiers {
    let val = if param > 0 { param - 1 } else { 0 };
    Modifiers::from_bits_truncate(val as u8)
}

/// SGR base button value. 3 means "no button" (motion or legacy release).
const fn decode_mouse_button(base: u16) -> Option<MouseButton> {
    match base {
        0 => Some(MouseButton::Left),
        1 => Some(MouseButton::Middle),
        2 => Some(MouseButton::Right),
        _ => None,
    }
}

const fn utf8_char_len(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 0,
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
