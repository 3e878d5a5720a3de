//! Color descriptors: the text form of a cell's color and style.
//!
//! A descriptor is a run of whitespace-separated words read left to right:
//!
//! ```text
//! 196 on 17 bold underline
//! red on black
//! on 4
//! ```
//!
//! Color words land in the foreground slot until the word `on` switches
//! the target to the background. A color word is either a palette index
//! (`0`–`255`) or one of the eight base color names. Attribute words
//! (`bold`, `underline`, `dim`, `italic`, `blink`, `reverse`) add a flag
//! and leave the colors alone. A slot nobody wrote stays at the terminal
//! default.
//!
//! Unknown color names and out-of-range numbers become color 0. Tiles in
//! the wild rely on that, so it is kept, but each fallback is logged.
//!
//! [`ColorSpec`] is the structured form used everywhere except file I/O.

use std::fmt;

use tp_term::cell::{Attr, UnderlineStyle};
use tp_term::color::CellColor;

/// Named base colors, in palette order.
const COLOR_NAMES: [&str; 8] = [
    "black", "red", "green", "yellow", "blue", "magenta", "cyan", "white",
];

/// Attribute words other than `underline`, in output order.
const ATTR_WORDS: [(&str, Attr); 5] = [
    ("bold", Attr::BOLD),
    ("dim", Attr::DIM),
    ("italic", Attr::ITALIC),
    ("blink", Attr::BLINK),
    ("reverse", Attr::REVERSE),
];

/// A parsed color descriptor.
///
/// `None` slots mean the terminal default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ColorSpec {
    pub fg: Option<u8>,
    pub bg: Option<u8>,
    pub attrs: Attr,
    pub underline: bool,
}

impl ColorSpec {
    /// No colors, no attributes.
    pub const PLAIN: Self = Self {
        fg: None,
        bg: None,
        attrs: Attr::empty(),
        underline: false,
    };

    /// Foreground only.
    #[must_use]
    pub const fn fg(index: u8) -> Self {
        Self {
            fg: Some(index),
            ..Self::PLAIN
        }
    }

    /// Parse a descriptor. Never fails; see the module docs for fallbacks.
    #[must_use]
    pub fn parse(descriptor: &str) -> Self {
        let mut spec = Self::PLAIN;
        let mut background = false;

        for word in descriptor.split_whitespace() {
            let lower = word.to_ascii_lowercase();
            if lower == "on" {
                background = true;
            } else if lower == "underline" {
                spec.underline = true;
            } else if let Some(&(_, flag)) = ATTR_WORDS.iter().find(|(name, _)| *name == lower) {
                spec.attrs |= flag;
            } else {
                let index = color_index(word);
                if background {
                    spec.bg = Some(index);
                } else {
                    spec.fg = Some(index);
                }
            }
        }

        spec
    }

    /// Whether bold is set.
    #[must_use]
    pub const fn bold(&self) -> bool {
        self.attrs.contains(Attr::BOLD)
    }

    /// A copy with bold switched on or off.
    #[must_use]
    pub fn with_bold(mut self, on: bool) -> Self {
        self.attrs.set(Attr::BOLD, on);
        self
    }

    /// A copy with underline switched on or off.
    #[must_use]
    pub const fn with_underline(mut self, on: bool) -> Self {
        self.underline = on;
        self
    }

    /// Whether this is the "no styling" descriptor.
    #[must_use]
    pub fn is_plain(&self) -> bool {
        *self == Self::PLAIN
    }

    /// Foreground as a cell color.
    #[must_use]
    pub const fn fg_color(&self) -> CellColor {
        CellColor::from_index(self.fg)
    }

    /// Background as a cell color.
    #[must_use]
    pub const fn bg_color(&self) -> CellColor {
        CellColor::from_index(self.bg)
    }

    /// Underline as a cell underline style.
    #[must_use]
    pub const fn underline_style(&self) -> UnderlineStyle {
        UnderlineStyle::from_flag(self.underline)
    }

    /// Just the attribute words, e.g. `"bold underline"`.
    #[must_use]
    pub fn attr_words(&self) -> String {
        let mut words: Vec<&str> = ATTR_WORDS
            .iter()
            .filter(|(_, flag)| self.attrs.contains(*flag))
            .map(|(name, _)| *name)
            .collect();
        if self.underline {
            words.push("underline");
        }
        words.join(" ")
    }
}

/// `"<fg> on <bg> <attrs>"`, leaving out whatever is unset.
impl fmt::Display for ColorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::with_capacity(4);
        if let Some(fg) = self.fg {
            parts.push(fg.to_string());
        }
        if let Some(bg) = self.bg {
            parts.push(format!("on {bg}"));
        }
        let attrs = self.attr_words();
        if !attrs.is_empty() {
            parts.push(attrs);
        }
        f.write_str(&parts.join(" "))
    }
}

fn color_index(word: &str) -> u8 {
    if word.bytes().all(|b| b.is_ascii_digit()) {
        return word.parse::<u8>().unwrap_or_else(|_| {
            tracing::warn!(word, "color index out of range, using 0");
            0
        });
    }
    let lower = word.to_ascii_lowercase();
    COLOR_NAMES
        .iter()
        .zip(0u8..)
        .find_map(|(name, idx)| (*name == lower).then_some(idx))
        .unwrap_or_else(|| {
            tracing::warn!(word, "unknown color name, using 0");
            0
        })
}
