//! One-line text prompt shown in place of the status notice.
//!
//! `^S` opens a `save as: ` prompt holding the tile's current path. While
//! it is open, keys edit the text instead of running commands.

use tp_term::input::{KeyCode, KeyEvent, Modifiers};

/// What a key did to the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Still editing.
    Editing,
    /// Enter: the final text.
    Accepted(String),
    /// Escape.
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    label: &'static str,
    input: String,
    /// Char offset into `input`.
    cursor: usize,
}

impl Prompt {
    /// A prompt with `initial` filled in and the cursor at its end.
    #[must_use]
    pub fn new(label: &'static str, initial: &str) -> Self {
        Self {
            label,
            input: initial.to_owned(),
            cursor: initial.chars().count(),
        }
    }

    #[inline]
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Label and text, as shown on the status line.
    #[must_use]
    pub fn line(&self) -> String {
        format!("{}{}", self.label, self.input)
    }

    /// Column of the cursor within [`line`](Self::line).
    #[must_use]
    pub fn cursor_column(&self) -> usize {
        self.label.chars().count() + self.cursor
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> Reply {
        match key.code {
            KeyCode::Enter => return Reply::Accepted(self.input.clone()),
            KeyCode::Escape => return Reply::Cancelled,
            KeyCode::Char(ch) if !key.modifiers.intersects(Modifiers::CTRL | Modifiers::ALT) => {
                self.insert_char(ch);
            }
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.input.chars().count()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.input.chars().count(),
            _ => {}
        }
        Reply::Editing
    }

    fn insert_char(&mut self, ch: char) {
        let at = self.byte_at(self.cursor);
        self.input.insert(at, ch);
        self.cursor += 1;
    }

    fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_at(self.cursor);
        self.input.remove(at);
    }

    fn delete(&mut self) {
        if self.cursor < self.input.chars().count() {
            let at = self.byte_at(self.cursor);
            self.input.remove(at);
        }
    }

    fn byte_at(&self, char_idx: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_idx)
            .map_or(self.input.len(), |(i, _)| i)
    }
}
