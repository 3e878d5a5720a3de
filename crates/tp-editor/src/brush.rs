//! The brush: what painting puts down.

use tp_term::cell::Attr;
use tp_tile::descriptor::ColorSpec;

/// Current paint character and color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Brush {
    /// One grapheme.
    pub ch: String,
    pub color: ColorSpec,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            ch: " ".to_owned(),
            color: ColorSpec::PLAIN,
        }
    }
}

impl Brush {
    pub fn set_bold(&mut self, on: bool) {
        self.color = self.color.with_bold(on);
    }

    pub const fn set_underline(&mut self, on: bool) {
        self.color = self.color.with_underline(on);
    }

    /// The attribute part painted by `paint-attrs`.
    #[must_use]
    pub const fn attrs(&self) -> (Attr, bool) {
        (self.color.attrs, self.color.underline)
    }

    // -----------------------------------------------------------------------
    // Status line labels
    // -----------------------------------------------------------------------

    /// Foreground label, `-` for the terminal default.
    #[must_use]
    pub fn fg_label(&self) -> String {
        self.color.fg.map_or_else(|| "-".to_owned(), |fg| fg.to_string())
    }

    #[must_use]
    pub fn bg_label(&self) -> String {
        match self.color.bg {
            Some(bg) => format!("on {bg}"),
            None => "on -".to_owned(),
        }
    }

    #[must_use]
    pub fn attr_label(&self) -> String {
        self.color.attr_words()
    }

    /// Just the foreground, for styling its label.
    #[must_use]
    pub const fn fg_spec(&self) -> ColorSpec {
        ColorSpec {
            fg: self.color.fg,
            ..ColorSpec::PLAIN
        }
    }

    #[must_use]
    pub const fn bg_spec(&self) -> ColorSpec {
        ColorSpec {
            bg: self.color.bg,
            ..ColorSpec::PLAIN
        }
    }

    #[must_use]
    pub const fn attr_spec(&self) -> ColorSpec {
        ColorSpec {
            attrs: self.color.attrs,
            underline: self.color.underline,
            ..ColorSpec::PLAIN
        }
    }
}
