//! Mouse gestures.
//!
//! The editor only acts on three buttons and three phases. Everything else
//! the terminal reports (drags, motion, the wheel) is not a gesture and is
//! only recorded in the key accumulator.
//!
//! [`Gesture::decode`] yields only presses and releases: SGR mouse
//! reporting has no click report. [`Phase::Click`] is for callers of
//! `Editor::handle_gesture` that deliver whole clicks themselves.

use std::fmt;

use tp_term::input::{MouseEvent, MouseEventKind};

/// Phase of a button gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Press,
    Release,
    /// Press and release in one report. SGR mouse reporting never produces
    /// this; it exists for callers that synthesize clicks.
    Click,
}

/// A decoded button gesture at a screen position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gesture {
    /// 1 = left, 2 = middle, 3 = right.
    pub button: u8,
    pub phase: Phase,
    pub x: u16,
    pub y: u16,
}

impl Gesture {
    #[must_use]
    pub const fn new(button: u8, phase: Phase, x: u16, y: u16) -> Self {
        Self {
            button,
            phase,
            x,
            y,
        }
    }

    /// Decode a mouse report.
    ///
    /// # Errors
    ///
    /// Reports that are not a press or release come back as the text
    /// recorded in the accumulator, e.g. `"Drag1(4, 2)"`.
    pub fn decode(event: &MouseEvent) -> Result<Self, String> {
        let (button, phase) = match event.kind {
            MouseEventKind::Press(b) => (b.number(), Phase::Press),
            MouseEventKind::Release(b) => (b.number(), Phase::Release),
            other => return Err(format!("{}({}, {})", kind_name(other), event.x, event.y)),
        };
        Ok(Self::new(button, phase, event.x, event.y))
    }
}

fn kind_name(kind: MouseEventKind) -> String {
    match kind {
        MouseEventKind::Press(b) => format!("Press{}", b.number()),
        MouseEventKind::Release(b) => format!("Release{}", b.number()),
        MouseEventKind::Drag(b) => format!("Drag{}", b.number()),
        MouseEventKind::Move => "Move".to_owned(),
        MouseEventKind::ScrollUp => "ScrollUp".to_owned(),
        MouseEventKind::ScrollDown => "ScrollDown".to_owned(),
        MouseEventKind::ScrollLeft => "ScrollLeft".to_owned(),
        MouseEventKind::ScrollRight => "ScrollRight".to_owned(),
    }
}

/// The accumulator text: `P1(3, 4)`, `R3(0, 0)`, `C1(9, 9)`.
impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase = match self.phase {
            Phase::Press => 'P',
            Phase::Release => 'R',
            Phase::Click => 'C',
        };
        write!(f, "{phase}{}({}, {})", self.button, self.x, self.y)
    }
}
