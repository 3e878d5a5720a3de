//! Commands and the key → command table.
//!
//! Every action the editor can take from the keyboard is a [`Command`].
//! The [`Keymap`] maps key names (see [`crate::keys`]) to commands; a
//! multi-key binding is just the accumulated names joined together, e.g.
//! `^[x` for Escape then `x`.
//!
//! Commands have stable kebab-case names so they can be bound from a
//! configuration file.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// A keyboard command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Move cursor and view together by the scroll rate.
    CoarseUp,
    CoarseDown,
    CoarseLeft,
    CoarseRight,
    /// Move the cursor by one cell.
    FineUp,
    FineDown,
    FineLeft,
    FineRight,
    GlyphPageUp,
    GlyphPageDown,
    ToggleColors,
    ToggleGlyphs,
    PaintChar,
    PaintFg,
    PaintBg,
    PaintAttrs,
    BoldOn,
    BoldOff,
    UnderlineOn,
    UnderlineOff,
    Save,
    View,
    Redraw,
    Quit,
}

const NAMES: [(Command, &str); 24] = [
    (Command::CoarseUp, "coarse-up"),
    (Command::CoarseDown, "coarse-down"),
    (Command::CoarseLeft, "coarse-left"),
    (Command::CoarseRight, "coarse-right"),
    (Command::FineUp, "fine-up"),
    (Command::FineDown, "fine-down"),
    (Command::FineLeft, "fine-left"),
    (Command::FineRight, "fine-right"),
    (Command::GlyphPageUp, "glyph-page-up"),
    (Command::GlyphPageDown, "glyph-page-down"),
    (Command::ToggleColors, "toggle-colors"),
    (Command::ToggleGlyphs, "toggle-glyphs"),
    (Command::PaintChar, "paint-char"),
    (Command::PaintFg, "paint-fg"),
    (Command::PaintBg, "paint-bg"),
    (Command::PaintAttrs, "paint-attrs"),
    (Command::BoldOn, "bold-on"),
    (Command::BoldOff, "bold-off"),
    (Command::UnderlineOn, "underline-on"),
    (Command::UnderlineOff, "underline-off"),
    (Command::Save, "save"),
    (Command::View, "view"),
    (Command::Redraw, "redraw"),
    (Command::Quit, "quit"),
];

impl Command {
    /// The configuration name, e.g. `"paint-char"`.
    #[must_use]
    pub fn name(self) -> &'static str {
        NAMES
            .iter()
            .find(|(cmd, _)| *cmd == self)
            .map_or("", |(_, name)| name)
    }

    /// Every command, in declaration order.
    pub fn all() -> impl Iterator<Item = Self> {
        NAMES.iter().map(|(cmd, _)| *cmd)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A command name that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown command '{0}'")]
pub struct UnknownCommand(pub String);

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NAMES
            .iter()
            .find(|(_, name)| *name == s)
            .map(|(cmd, _)| *cmd)
            .ok_or_else(|| UnknownCommand(s.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Keymap
// ---------------------------------------------------------------------------

const DEFAULT_BINDINGS: [(&str, Command); 24] = [
    ("Up", Command::CoarseUp),
    ("Down", Command::CoarseDown),
    ("Left", Command::CoarseLeft),
    ("Right", Command::CoarseRight),
    ("S-Up", Command::FineUp),
    ("S-Down", Command::FineDown),
    ("S-Left", Command::FineLeft),
    ("S-Right", Command::FineRight),
    ("PgUp", Command::GlyphPageUp),
    ("PgDn", Command::GlyphPageDown),
    ("c", Command::ToggleColors),
    ("C", Command::ToggleGlyphs),
    ("space", Command::PaintChar),
    ("<", Command::PaintFg),
    (">", Command::PaintBg),
    ("a", Command::PaintAttrs),
    ("B", Command::BoldOn),
    ("b", Command::BoldOff),
    ("U", Command::UnderlineOn),
    ("u", Command::UnderlineOff),
    ("^S", Command::Save),
    ("^Y", Command::View),
    ("^L", Command::Redraw),
    ("q", Command::Quit),
];

/// Key name → command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keymap {
    bindings: HashMap<String, Command>,
}

impl Keymap {
    /// A keymap with nothing bound.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// The default bindings with `overrides` (key name → command name)
    /// applied on top.
    ///
    /// # Errors
    ///
    /// [`UnknownCommand`] for the first override naming no command.
    pub fn with_overrides<'a>(
        overrides: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, UnknownCommand> {
        let mut keymap = Self::default();
        for (key, command) in overrides {
            keymap.bind(key, command.parse()?);
        }
        Ok(keymap)
    }

    /// Bind `key` to `command`, replacing any previous binding.
    pub fn bind(&mut self, key: &str, command: Command) {
        self.bindings.insert(key.to_owned(), command);
    }

    /// The command for `key`, if bound.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Command> {
        self.bindings.get(key).copied()
    }

    /// The command for an accumulated key sequence, falling back to the
    /// last key alone.
    #[must_use]
    pub fn lookup(&self, accumulated: &str, last: &str) -> Option<Command> {
        self.get(accumulated).or_else(|| self.get(last))
    }

    /// Number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Default for Keymap {
    fn default() -> Self {
        let mut keymap = Self::empty();
        for (key, command) in DEFAULT_BINDINGS {
            keymap.bind(key, command);
        }
        keymap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn names_round_trip() {
        for command in Command::all() {
            assert_eq!(command.name().parse::<Command>(), Ok(command));
        }
        assert_eq!(Command::all().count(), NAMES.len());
    }

    #[test]
    fn unknown_name() {
        assert_eq!(
            "paint-everything".parse::<Command>(),
            Err(UnknownCommand("paint-everything".into()))
        );
        assert_eq!(
            UnknownCommand("x".into()).to_string(),
            "unknown command 'x'"
        );
    }

    #[test]
    fn every_command_has_a_default_key() {
        let keymap = Keymap::default();
        for command in Command::all() {
            assert!(
                DEFAULT_BINDINGS.iter().any(|(_, c)| *c == command),
                "{command} unbound"
            );
        }
        assert_eq!(keymap.len(), DEFAULT_BINDINGS.len());
    }

    #[test]
    fn defaults() {
        let keymap = Keymap::default();
        assert_eq!(keymap.get("space"), Some(Command::PaintChar));
        assert_eq!(keymap.get("S-Left"), Some(Command::FineLeft));
        assert_eq!(keymap.get("^S"), Some(Command::Save));
        assert_eq!(keymap.get("z"), None);
    }

    #[test]
    fn lookup_prefers_the_sequence() {
        let mut keymap = Keymap::default();
        keymap.bind("^[q", Command::Redraw);
        assert_eq!(keymap.lookup("^[q", "q"), Some(Command::Redraw));
        assert_eq!(keymap.lookup("^[b", "b"), Some(Command::BoldOff));
        assert_eq!(keymap.lookup("^[z", "z"), None);
    }

    #[test]
    fn overrides_replace_defaults() {
        let keymap = Keymap::with_overrides([("q", "redraw"), ("x", "quit")]).unwrap();
        assert_eq!(keymap.get("q"), Some(Command::Redraw));
        assert_eq!(keymap.get("x"), Some(Command::Quit));
        assert_eq!(keymap.get("c"), Some(Command::ToggleColors));
    }

    #[test]
    fn overrides_reject_unknown_commands() {
        let err = Keymap::with_overrides([("q", "explode")]).unwrap_err();
        assert_eq!(err, UnknownCommand("explode".into()));
    }
}
