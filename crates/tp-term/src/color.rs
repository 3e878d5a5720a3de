// SPDX-License-Identifier: MIT
//
// CellColor: the color stored in every cell.
//
// Tiles are painted with the 256-color palette: indices 0–7 are the
// standard colors, 8–15 their bright variants, 16–231 a 6×6×6 cube and
// 232–255 a grayscale ramp. `Default` leaves the slot to the terminal's
// own theme, which is what an unstyled tile cell gets.

use std::fmt;

/// Compact color for terminal cell storage.
///
/// Small and `Copy` so the diff renderer can compare cells with a plain
/// equality check.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellColor {
    /// ANSI 256-color palette index.
    Ansi256(u8),

    /// Terminal default color (inherits from terminal settings).
    #[default]
    Default,
}

impl CellColor {
    /// Map an optional palette index to a cell color, `None` being the
    /// terminal default.
    #[inline]
    #[must_use]
    pub const fn from_index(index: Option<u8>) -> Self {
        match index {
            Some(idx) => Self::Ansi256(idx),
            None => Self::Default,
        }
    }

    /// The palette index, or `None` for the terminal default.
    #[inline]
    #[must_use]
    pub const fn index(self) -> Option<u8> {
        match self {
            Self::Ansi256(idx) => Some(idx),
            Self::Default => None,
        }
    }

    /// Whether this is the terminal default color.
    #[inline]
    #[must_use]
    pub const fn is_default(self) -> bool {
        matches!(self, Self::Default)
    }
}

impl fmt::Debug for CellColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ansi256(idx) => write!(f, "ansi({idx})"),
            Self::Default => write!(f, "default"),
        }
    }
}

impl fmt::Display for CellColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl From<u8> for CellColor {
    fn from(idx: u8) -> Self {
        Self::Ansi256(idx)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_terminal_default() {
        assert_eq!(CellColor::default(), CellColor::Default);
        assert!(CellColor::Default.is_default());
        assert!(!CellColor::Ansi256(0).is_default());
    }

    #[test]
    fn from_index_round_trips() {
        assert_eq!(CellColor::from_index(Some(42)), CellColor::Ansi256(42));
        assert_eq!(CellColor::from_index(None), CellColor::Default);
        assert_eq!(CellColor::Ansi256(200).index(), Some(200));
        assert_eq!(CellColor::Default.index(), None);
    }

    #[test]
    fn from_u8() {
        assert_eq!(CellColor::from(7), CellColor::Ansi256(7));
    }

    #[test]
    fn debug_format() {
        assert_eq!(format!("{:?}", CellColor::Ansi256(16)), "ansi(16)");
        assert_eq!(format!("{}", CellColor::Default), "default");
    }
}
