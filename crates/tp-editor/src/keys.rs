//! Key names: the strings keys are bound and displayed by.
//!
//! | Key                  | Name          |
//! |----------------------|---------------|
//! | `a`, `<`, `é`        | itself        |
//! | Space                | `space`       |
//! | Ctrl+S               | `^S`          |
//! | Escape               | `^[`          |
//! | Alt+x                | `^[x`         |
//! | Up, Shift+Up         | `Up`, `S-Up`  |
//! | Ctrl+Left            | `C-Left`      |
//! | Page Up / Down       | `PgUp`, `PgDn`|
//! | F5                   | `F5`          |
//!
//! Alt is spelled as the escape prefix so that `Alt+x` and `Esc` followed
//! by `x` accumulate to the same string.

use tp_term::input::{KeyCode, KeyEvent, Modifiers};

/// Name of the Escape key, and the prefix for Alt-modified keys.
pub const ESCAPE: &str = "^[";

/// The display/binding name of a key press.
#[must_use]
pub fn key_name(key: &KeyEvent) -> String {
    let base = base_name(key.code, key.modifiers);
    if key.modifiers.contains(Modifiers::ALT) {
        format!("{ESCAPE}{base}")
    } else {
        base
    }
}

fn base_name(code: KeyCode, modifiers: Modifiers) -> String {
    let ctrl = modifiers.contains(Modifiers::CTRL);
    let shift = modifiers.contains(Modifiers::SHIFT);

    let special = match code {
        KeyCode::Char(c) if ctrl => return control_name(c),
        KeyCode::Char(' ') => return "space".to_owned(),
        KeyCode::Char(c) => return c.to_string(),
        KeyCode::Escape => return ESCAPE.to_owned(),
        KeyCode::F(n) => return format!("{}F{n}", prefix(ctrl, shift)),
        KeyCode::Enter => "Enter",
        KeyCode::Tab => "Tab",
        KeyCode::Backspace => "Backspace",
        KeyCode::Delete => "Del",
        KeyCode::Insert => "Ins",
        KeyCode::Up => "Up",
        KeyCode::Down => "Down",
        KeyCode::Left => "Left",
        KeyCode::Right => "Right",
        KeyCode::Home => "Home",
        KeyCode::End => "End",
        KeyCode::PageUp => "PgUp",
        KeyCode::PageDown => "PgDn",
    };
    format!("{}{special}", prefix(ctrl, shift))
}

const fn prefix(ctrl: bool, shift: bool) -> &'static str {
    match (ctrl, shift) {
        (true, true) => "C-S-",
        (true, false) => "C-",
        (false, true) => "S-",
        (false, false) => "",
    }
}

/// Caret notation for Ctrl+char: `^A`..`^Z` plus the punctuation controls.
fn control_name(c: char) -> String {
    match c {
        'a'..='z' | 'A'..='Z' => format!("^{}", c.to_ascii_uppercase()),
        ' ' | '@' => "^@".to_owned(),
        '[' | '\\' | ']' | '^' | '_' => format!("^{c}"),
        _ => format!("C-{c}"),
    }
}
