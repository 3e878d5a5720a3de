//! The editor state machine.
//!
//! [`Editor`] owns the tile, the pair palette and every viewport, and turns
//! input into edits:
//!
//! | State                          | Entered by            | Left by            |
//! |--------------------------------|-----------------------|--------------------|
//! | `Normal`                       | start, any release    | prefix key, press  |
//! | `AwaitingPrefixContinuation`   | a prefix key (`^[`)   | the next key       |
//! | `MouseButtonDown(button)`      | a button press        | any release        |
//!
//! # Keys
//!
//! Key names accumulate while the accumulator holds a prefix, so `Esc` then
//! `x` (or `Alt+x`) looks up `^[x` first and then plain `x`. A prefix key
//! always starts over, so `Esc Esc x` is `^[x`. Anything the keymap does not
//! know becomes an "unknown key" notice.
//!
//! `^S` opens a `save as:` prompt on the status line, filled in with the
//! tile's path. Until Enter or Esc, keys edit the prompt text.
//!
//! # Mouse
//!
//! Button 1 moves the cursor to the clicked cell. Button 3 is the
//! eyedropper: press and release it on the same cell to load the brush from
//! whatever was drawn there. The glyph browser gives only the character,
//! the color browser only the color, the canvas both.
//!
//! # Errors
//!
//! Command and drawing failures become the status notice. Palette
//! exhaustion, and any failure while the debug setting is on, is kept as
//! the fatal error and ends the session.

use std::path::PathBuf;

use tp_term::buffer::FrameBuffer;
use tp_term::cell::UnderlineStyle;
use tp_term::input::{Event, KeyEvent, MouseEvent};
use tp_tile::document::TileDocument;
use tp_tile::error::DrawError;
use tp_tile::palette::ColorPalette;
use tp_tile::viewport::{BlitMode, Viewport};

use crate::brush::Brush;
use crate::error::{EditorError, PickFailure};
use crate::gesture::{Gesture, Phase};
use crate::keymap::{Command, Keymap};
use crate::keys::{self, ESCAPE};
use crate::panels;
use crate::prompt::{Prompt, Reply};
use crate::status::{self, StatusLine};

/// Glyph browser page size.
const CODEPAGE_STEP: u32 = 0x100;
/// Start of the last full page below U+10FFFF.
const LAST_CODEPAGE: u32 = 0x10_FF00;

const SAVE_AS: &str = "save as: ";

const LEFT_BUTTON: u8 = 1;
const PICK_BUTTON: u8 = 3;

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Tunables the editor takes from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Cells moved by the coarse arrows.
    pub scroll_rate: i32,
    /// Key names that wait for another key.
    pub prefixes: Vec<String>,
    /// First codepoint of the glyph browser.
    pub codepage: u32,
    /// Treat every failure as fatal.
    pub debug: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scroll_rate: 4,
            prefixes: vec![ESCAPE.to_owned()],
            codepage: 0x2600,
            debug: false,
        }
    }
}

// ---------------------------------------------------------------------------
// State / Outcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum State {
    #[default]
    Normal,
    AwaitingPrefixContinuation,
    MouseButtonDown(u8),
}

/// What the session loop should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Quit,
    /// Repaint everything from scratch.
    Redraw,
    /// Show the tile in the external viewer.
    View,
}

// ---------------------------------------------------------------------------
// Editor
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct Editor {
    doc: TileDocument,
    palette: ColorPalette,
    keymap: Keymap,
    settings: Settings,

    /// Document coordinates.
    cursor: (i32, i32),
    /// Document position of the canvas's top-left cell.
    scroll: (i32, i32),
    brush: Brush,
    codepage: u32,
    show_colors: bool,
    show_glyphs: bool,

    accumulator: String,
    pending_press: Option<Gesture>,
    state: State,
    prompt: Option<Prompt>,
    status: String,
    /// First recoverable error of the last frame.
    draw_problem: Option<String>,
    fatal: Option<EditorError>,

    canvas: Viewport,
    color_panel: Viewport,
    glyph_panel: Viewport,
    status_bar: Viewport,
    screen: (u16, u16),
}

impl Editor {
    #[must_use]
    pub fn new(doc: TileDocument, palette: ColorPalette, keymap: Keymap, settings: Settings) -> Self {
        let (cx, cy, cw, ch) = panels::COLOR_PANEL;
        let (gx, gy, gw, gh) = panels::GLYPH_PANEL;
        Self {
            doc,
            palette,
            keymap,
            codepage: settings.codepage,
            settings,
            cursor: (0, 0),
            scroll: (0, 0),
            brush: Brush::default(),
            show_colors: false,
            show_glyphs: false,
            accumulator: String::new(),
            pending_press: None,
            state: State::Normal,
            prompt: None,
            status: String::new(),
            draw_problem: None,
            fatal: None,
            canvas: Viewport::new(0, 0, 0, 0),
            color_panel: Viewport::new(cx, cy, cw, ch),
            glyph_panel: Viewport::new(gx, gy, gw, gh),
            status_bar: Viewport::new(0, 0, 0, 0),
            screen: (0, 0),
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    #[must_use]
    pub const fn document(&self) -> &TileDocument {
        &self.doc
    }

    #[must_use]
    pub const fn palette(&self) -> &ColorPalette {
        &self.palette
    }

    #[must_use]
    pub const fn cursor(&self) -> (i32, i32) {
        self.cursor
    }

    pub const fn set_cursor(&mut self, x: i32, y: i32) {
        self.cursor = (x, y);
    }

    #[must_use]
    pub const fn scroll(&self) -> (i32, i32) {
        self.scroll
    }

    #[must_use]
    pub const fn brush(&self) -> &Brush {
        &self.brush
    }

    pub const fn brush_mut(&mut self) -> &mut Brush {
        &mut self.brush
    }

    #[must_use]
    pub const fn codepage(&self) -> u32 {
        self.codepage
    }

    #[must_use]
    pub fn accumulator(&self) -> &str {
        &self.accumulator
    }

    #[must_use]
    pub const fn state(&self) -> State {
        self.state
    }

    /// The open `save as:` prompt.
    #[must_use]
    pub const fn prompt(&self) -> Option<&Prompt> {
        self.prompt.as_ref()
    }

    /// `(color browser, glyph browser)` visibility.
    #[must_use]
    pub const fn panels_shown(&self) -> (bool, bool) {
        (self.show_colors, self.show_glyphs)
    }

    /// The notice the status line shows: a drawing problem if the last
    /// frame had one, else the last command's message.
    #[must_use]
    pub fn notice(&self) -> &str {
        self.draw_problem.as_deref().unwrap_or(&self.status)
    }

    /// The error that ended the session, if any.
    #[must_use]
    pub const fn fatal(&self) -> Option<&EditorError> {
        self.fatal.as_ref()
    }

    pub const fn take_fatal(&mut self) -> Option<EditorError> {
        self.fatal.take()
    }

    /// Replace the status notice.
    pub fn notify(&mut self, message: impl Into<String>) {
        self.status = message.into();
    }

    /// The tile as SGR text for the external viewer.
    #[must_use]
    pub fn snapshot(&self) -> String {
        self.doc.render_ansi()
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    pub fn handle_event(&mut self, event: &Event) -> Outcome {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
        }
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> Outcome {
        if self.prompt.is_some() {
            return self.prompt_key(key);
        }
        self.begin_event();
        let name = keys::key_name(key);
        self.accumulator.push_str(&name);

        if self.is_prefix(&name) {
            self.accumulator = name.clone();
        }
        if self.is_prefix(&self.accumulator) {
            self.state = State::AwaitingPrefixContinuation;
            return Outcome::Continue;
        }
        if self.state == State::AwaitingPrefixContinuation {
            self.state = State::Normal;
        }

        let Some(command) = self.keymap.lookup(&self.accumulator, &name) else {
            tracing::debug!(key = %self.accumulator, "unbound key");
            self.status = format!("unknown key '{}'", self.accumulator);
            return Outcome::Continue;
        };
        tracing::debug!(key = %self.accumulator, %command, "dispatch");
        self.run(command).unwrap_or_else(|err| self.report(err))
    }

    fn prompt_key(&mut self, key: &KeyEvent) -> Outcome {
        self.status.clear();
        let Some(prompt) = self.prompt.as_mut() else {
            return Outcome::Continue;
        };
        match prompt.handle_key(key) {
            Reply::Editing => Outcome::Continue,
            Reply::Cancelled => {
                self.prompt = None;
                self.status = "save cancelled".to_owned();
                Outcome::Continue
            }
            Reply::Accepted(text) => {
                self.prompt = None;
                match self.save_as(&text) {
                    Ok(()) => Outcome::Continue,
                    Err(err) => self.report(err),
                }
            }
        }
    }

    pub fn handle_mouse(&mut self, event: &MouseEvent) -> Outcome {
        match Gesture::decode(event) {
            Ok(gesture) => self.handle_gesture(gesture),
            Err(diagnostic) => {
                self.begin_event();
                self.accumulator.push_str(&diagnostic);
                Outcome::Continue
            }
        }
    }

    pub fn handle_gesture(&mut self, gesture: Gesture) -> Outcome {
        self.begin_event();
        tracing::debug!(%gesture, "mouse");
        match gesture.phase {
            Phase::Press => {
                self.accumulator = gesture.to_string();
                self.pending_press = Some(gesture);
                self.state = State::MouseButtonDown(gesture.button);
            }
            Phase::Release => {
                self.accumulator = gesture.to_string();
                self.state = State::Normal;
                let press = self.pending_press.take();
                match gesture.button {
                    LEFT_BUTTON => self.move_cursor_to(gesture.x, gesture.y),
                    PICK_BUTTON => {
                        if let Err(failure) = self.pick(press, gesture) {
                            return self.report(failure.into());
                        }
                    }
                    _ => {}
                }
            }
            Phase::Click => {
                self.accumulator.push_str(&gesture.to_string());
                self.state = State::Normal;
                if gesture.button == LEFT_BUTTON {
                    self.move_cursor_to(gesture.x, gesture.y);
                }
            }
        }
        Outcome::Continue
    }

    fn begin_event(&mut self) {
        self.status.clear();
        if !self.is_prefix(&self.accumulator) {
            self.accumulator.clear();
        }
    }

    fn is_prefix(&self, keys: &str) -> bool {
        self.settings.prefixes.iter().any(|p| p == keys)
    }

    /// Turn a failure into a notice, or into the fatal error.
    fn report(&mut self, err: EditorError) -> Outcome {
        self.status = err.to_string();
        if err.is_fatal() || self.settings.debug {
            tracing::error!(error = %err, "fatal editor error");
            self.fatal = Some(err);
            Outcome::Quit
        } else {
            tracing::debug!(error = %err, "command failed");
            Outcome::Continue
        }
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    fn run(&mut self, command: Command) -> Result<Outcome, EditorError> {
        let rate = self.settings.scroll_rate;
        let (x, y) = self.cursor;
        match command {
            Command::CoarseUp => self.pan(0, -rate),
            Command::CoarseDown => self.pan(0, rate),
            Command::CoarseLeft => self.pan(-rate, 0),
            Command::CoarseRight => self.pan(rate, 0),
            Command::FineUp => self.nudge(0, -1),
            Command::FineDown => self.nudge(0, 1),
            Command::FineLeft => self.nudge(-1, 0),
            Command::FineRight => self.nudge(1, 0),
            Command::GlyphPageUp => self.codepage = self.codepage.saturating_sub(CODEPAGE_STEP),
            Command::GlyphPageDown => {
                self.codepage = self.codepage.saturating_add(CODEPAGE_STEP).min(LAST_CODEPAGE);
            }
            Command::ToggleColors => self.show_colors = !self.show_colors,
            Command::ToggleGlyphs => self.show_glyphs = !self.show_glyphs,
            Command::PaintChar => self.doc.set_char(x, y, &self.brush.ch)?,
            Command::PaintFg => self.doc.set_fg(x, y, self.brush.color.fg)?,
            Command::PaintBg => self.doc.set_bg(x, y, self.brush.color.bg)?,
            Command::PaintAttrs => {
                let (attrs, underline) = self.brush.attrs();
                self.doc.set_attr_flags(x, y, attrs, underline)?;
            }
            Command::BoldOn => self.brush.set_bold(true),
            Command::BoldOff => self.brush.set_bold(false),
            Command::UnderlineOn => self.brush.set_underline(true),
            Command::UnderlineOff => self.brush.set_underline(false),
            Command::Save => self.open_save_prompt(),
            Command::View => return Ok(Outcome::View),
            Command::Redraw => return Ok(Outcome::Redraw),
            Command::Quit => return Ok(Outcome::Quit),
        }
        Ok(Outcome::Continue)
    }

    /// Move cursor and view together.
    const fn pan(&mut self, dx: i32, dy: i32) {
        self.nudge(dx, dy);
        self.scroll.0 = self.scroll.0.saturating_add(dx);
        self.scroll.1 = self.scroll.1.saturating_add(dy);
    }

    const fn nudge(&mut self, dx: i32, dy: i32) {
        self.cursor.0 = self.cursor.0.saturating_add(dx);
        self.cursor.1 = self.cursor.1.saturating_add(dy);
    }

    fn open_save_prompt(&mut self) {
        let current = self
            .doc
            .path()
            .map(|path| path.display().to_string())
            .unwrap_or_default();
        self.prompt = Some(Prompt::new(SAVE_AS, &current));
    }

    /// Write the tile to `text`, which then becomes its path.
    fn save_as(&mut self, text: &str) -> Result<(), EditorError> {
        if text.is_empty() {
            return Err(EditorError::NoPath);
        }
        let path = PathBuf::from(text);
        self.doc.save(&path)?;
        self.status = format!("saved {}", path.display());
        Ok(())
    }

    fn move_cursor_to(&mut self, x: u16, y: u16) {
        self.cursor = (
            self.scroll.0.saturating_add(i32::from(x)),
            self.scroll.1.saturating_add(i32::from(y)),
        );
    }

    /// Load the brush from what is drawn under `release`. The press before
    /// it must be the same button on the same cell.
    fn pick(&mut self, press: Option<Gesture>, release: Gesture) -> Result<(), PickFailure> {
        let spot = |g: Gesture| (g.button, g.x, g.y);
        if press.map(spot) != Some(spot(release)) {
            return Err(PickFailure::CursorMoved);
        }
        let (x, y) = (release.x, release.y);

        if self.show_glyphs && self.glyph_panel.contains(x, y) {
            let (glyph, _) = self.glyph_panel.live_at(x, y).ok_or(PickFailure::NoContents)?;
            self.brush.ch = glyph.to_owned();
            self.status = format!("char now {}", self.brush.ch);
        } else if self.show_colors && self.color_panel.contains(x, y) {
            let (_, style) = self.color_panel.live_at(x, y).ok_or(PickFailure::NoContents)?;
            self.brush.color = self.palette.describe(style);
            self.status = format!("color now {}", self.brush.color);
        } else {
            let (glyph, style) = self.canvas.live_at(x, y).ok_or(PickFailure::NoContents)?;
            self.brush.ch = glyph.to_owned();
            self.brush.color = self.palette.describe(style);
            self.status = format!("char now {}", self.brush.ch);
        }
        tracing::debug!(ch = %self.brush.ch, color = %self.brush.color, "picked");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Frame
    // -----------------------------------------------------------------------

    /// Lay the viewports out for a `cols × rows` screen.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.screen = (cols, rows);
        self.canvas.reshape(0, 0, cols, rows.saturating_sub(2));
        self.status_bar
            .reshape(0, rows.saturating_sub(1), cols, u16::from(rows > 0));
    }

    /// Scroll so the cursor is within one screen of the view.
    pub fn clamp_cursor(&mut self) {
        let (width, height) = (
            i32::from(self.canvas.width()),
            i32::from(self.canvas.height()),
        );
        let (x, y) = self.cursor;
        if x < self.scroll.0 {
            self.scroll.0 = x;
        }
        if x > self.scroll.0.saturating_add(width) {
            self.scroll.0 = x.saturating_sub(width);
        }
        if y < self.scroll.1 {
            self.scroll.1 = y;
        }
        if y > self.scroll.1.saturating_add(height) {
            self.scroll.1 = y.saturating_sub(height);
        }
    }

    /// Draw a whole frame.
    ///
    /// The first recoverable drawing error of the frame replaces the
    /// notice; a fatal one is kept for [`fatal`](Self::fatal).
    pub fn draw(&mut self, surface: &mut FrameBuffer) {
        self.resize(surface.width(), surface.height());
        self.clamp_cursor();

        let parts = [
            self.draw_canvas(surface),
            self.draw_color_panel(surface),
            self.draw_glyph_panel(surface),
        ];
        self.draw_problem = None;
        if let Some(err) = parts.into_iter().find_map(Result::err) {
            self.frame_error(err);
        }
        self.mark_pending_pick(surface);

        let notice = self
            .prompt
            .as_ref()
            .map_or_else(|| self.notice().to_owned(), Prompt::line);
        let line = StatusLine {
            accumulator: &self.accumulator,
            cursor: self.cursor,
            screen: self.screen,
            brush: &self.brush,
            notice: &notice,
        };
        if let Err(err) = line.draw(&mut self.status_bar, surface, &mut self.palette) {
            self.frame_error(err);
        }
    }

    /// Where the terminal cursor goes: in the prompt text while one is
    /// open, else on the cursor cell if that is on screen.
    #[must_use]
    pub fn screen_cursor(&self) -> Option<(u16, u16)> {
        if let Some(prompt) = &self.prompt {
            let column = u16::try_from(prompt.cursor_column()).ok()?;
            let x = status::NOTICE_COLUMN.checked_add(column)?;
            let bar = &self.status_bar;
            return (x < bar.width() && bar.height() > 0).then(|| (bar.x1() + x, bar.y1()));
        }
        let dx = self.cursor.0.checked_sub(self.scroll.0)?;
        let dy = self.cursor.1.checked_sub(self.scroll.1)?;
        let dx = u16::try_from(dx).ok().filter(|&dx| dx < self.canvas.width())?;
        let dy = u16::try_from(dy).ok().filter(|&dy| dy < self.canvas.height())?;
        Some((self.canvas.x1() + dx, self.canvas.y1() + dy))
    }

    fn draw_canvas(&mut self, surface: &mut FrameBuffer) -> Result<(), DrawError> {
        self.canvas.erase(surface)?;
        self.canvas
            .blit(surface, &mut self.palette, &self.doc, self.scroll, BlitMode::Tile)
    }

    fn draw_color_panel(&mut self, surface: &mut FrameBuffer) -> Result<(), DrawError> {
        if !self.show_colors {
            return Ok(());
        }
        panels::draw_colors(&mut self.color_panel, surface, &mut self.palette)
    }

    fn draw_glyph_panel(&mut self, surface: &mut FrameBuffer) -> Result<(), DrawError> {
        if !self.show_glyphs {
            return Ok(());
        }
        panels::draw_glyphs(&mut self.glyph_panel, surface, &mut self.palette, self.codepage)
    }

    fn frame_error(&mut self, err: DrawError) {
        let err = EditorError::from(err);
        if err.is_fatal() || self.settings.debug {
            tracing::error!(error = %err, "fatal drawing error");
            self.status = err.to_string();
            self.fatal.get_or_insert(err);
        } else if self.draw_problem.is_none() {
            tracing::debug!(error = %err, "frame incomplete");
            self.draw_problem = Some(err.to_string());
        }
    }

    /// Underline the cell under a held pick button.
    fn mark_pending_pick(&self, surface: &mut FrameBuffer) {
        if self.state != State::MouseButtonDown(PICK_BUTTON) {
            return;
        }
        if let Some(press) = self.pending_press {
            if let Some(cell) = surface.get_mut(press.x, press.y) {
                cell.underline = UnderlineStyle::Straight;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tp_term::input::{KeyCode, Modifiers, MouseButton, MouseEventKind};
    use tp_tile::descriptor::ColorSpec;

    fn editor_with(doc: TileDocument) -> Editor {
        Editor::new(doc, ColorPalette::default(), Keymap::default(), Settings::default())
    }

    fn editor() -> Editor {
        editor_with(TileDocument::blank(8, 4))
    }

    fn press(ed: &mut Editor, c: char) -> Outcome {
        ed.handle_key(&KeyEvent::plain(KeyCode::Char(c)))
    }

    fn key(ed: &mut Editor, code: KeyCode, mods: Modifiers) -> Outcome {
        ed.handle_key(&KeyEvent::with(code, mods))
    }

    fn type_text(ed: &mut Editor, text: &str) {
        for c in text.chars() {
            press(ed, c);
        }
    }

    fn enter(ed: &mut Editor) -> Outcome {
        key(ed, KeyCode::Enter, Modifiers::empty())
    }

    fn debug_settings() -> Settings {
        Settings {
            debug: true,
            ..Settings::default()
        }
    }

    fn pick_at(ed: &mut Editor, x: u16, y: u16) {
        ed.handle_gesture(Gesture::new(3, Phase::Press, x, y));
        ed.handle_gesture(Gesture::new(3, Phase::Release, x, y));
    }

    fn sample() -> TileDocument {
        TileDocument::parse("#C r 196 on 17 bold\n#M r  \n#M    \nab☃\ncde\n").unwrap()
    }

    // -- Movement -----------------------------------------------------------

    #[test]
    fn coarse_arrows_move_cursor_and_view() {
        let mut ed = editor();
        key(&mut ed, KeyCode::Down, Modifiers::empty());
        key(&mut ed, KeyCode::Right, Modifiers::empty());
        assert_eq!(ed.cursor(), (4, 4));
        assert_eq!(ed.scroll(), (4, 4));
        key(&mut ed, KeyCode::Up, Modifiers::empty());
        assert_eq!(ed.cursor(), (4, 0));
    }

    #[test]
    fn fine_arrows_move_only_the_cursor() {
        let mut ed = editor();
        key(&mut ed, KeyCode::Right, Modifiers::SHIFT);
        key(&mut ed, KeyCode::Down, Modifiers::SHIFT);
        key(&mut ed, KeyCode::Down, Modifiers::SHIFT);
        assert_eq!(ed.cursor(), (1, 2));
        assert_eq!(ed.scroll(), (0, 0));
    }

    #[test]
    fn scroll_rate_is_configurable() {
        let settings = Settings {
            scroll_rate: 10,
            ..Settings::default()
        };
        let mut ed = Editor::new(TileDocument::blank(2, 2), ColorPalette::default(), Keymap::default(), settings);
        key(&mut ed, KeyCode::Left, Modifiers::empty());
        assert_eq!(ed.cursor(), (-10, 0));
    }

    #[test]
    fn clamp_scrolls_right() {
        let mut ed = editor();
        ed.resize(40, 22);
        ed.set_cursor(45, 0);
        ed.clamp_cursor();
        assert_eq!(ed.scroll(), (5, 0));
    }

    #[test]
    fn clamp_scrolls_left_and_up() {
        let mut ed = editor();
        ed.resize(40, 22);
        ed.set_cursor(-3, -7);
        ed.clamp_cursor();
        assert_eq!(ed.scroll(), (-3, -7));
    }

    #[test]
    fn clamp_leaves_visible_cursor_alone() {
        let mut ed = editor();
        ed.resize(40, 22);
        ed.set_cursor(40, 20);
        ed.clamp_cursor();
        assert_eq!(ed.scroll(), (0, 0));
    }

    #[test]
    fn glyph_pages() {
        let mut ed = editor();
        key(&mut ed, KeyCode::PageDown, Modifiers::empty());
        assert_eq!(ed.codepage(), 0x2700);
        key(&mut ed, KeyCode::PageUp, Modifiers::empty());
        key(&mut ed, KeyCode::PageUp, Modifiers::empty());
        assert_eq!(ed.codepage(), 0x2500);
    }

    #[test]
    fn panel_toggles() {
        let mut ed = editor();
        press(&mut ed, 'c');
        assert_eq!(ed.panels_shown(), (true, false));
        press(&mut ed, 'C');
        press(&mut ed, 'c');
        assert_eq!(ed.panels_shown(), (false, true));
    }

    // -- Painting -----------------------------------------------------------

    #[test]
    fn paint_char_and_colors() {
        let mut ed = editor();
        ed.brush_mut().ch = "▒".into();
        ed.brush_mut().color = ColorSpec::parse("3 on 4 bold");
        ed.set_cursor(2, 1);
        press(&mut ed, ' ');
        press(&mut ed, '<');
        press(&mut ed, '>');
        press(&mut ed, 'a');
        assert_eq!(ed.document().cell_at(2, 1).unwrap().0, "▒");
        assert_eq!(ed.document().color_at(2, 1).unwrap(), "3 on 4 bold");
        assert_eq!(ed.document().color_at(3, 1).unwrap(), "");
    }

    #[test]
    fn paint_fg_keeps_the_rest() {
        let mut ed = editor_with(sample());
        ed.brush_mut().color = ColorSpec::fg(2);
        press(&mut ed, '<');
        assert_eq!(ed.document().color_at(0, 0).unwrap(), "2 on 17 bold");
    }

    #[test]
    fn paint_outside_the_tile_is_a_notice() {
        let mut ed = editor();
        key(&mut ed, KeyCode::Left, Modifiers::SHIFT);
        assert_eq!(press(&mut ed, ' '), Outcome::Continue);
        assert_eq!(ed.notice(), "(-1, 0) is outside the tile");
        assert!(ed.fatal().is_none());
    }

    #[test]
    fn bold_add_is_idempotent() {
        let mut ed = editor();
        press(&mut ed, 'B');
        let once = ed.brush().clone();
        press(&mut ed, 'B');
        assert_eq!(ed.brush(), &once);
        assert!(ed.brush().color.bold());
        press(&mut ed, 'b');
        press(&mut ed, 'b');
        assert!(!ed.brush().color.bold());
    }

    #[test]
    fn underline_toggles() {
        let mut ed = editor();
        press(&mut ed, 'U');
        assert!(ed.brush().color.underline);
        press(&mut ed, 'u');
        assert!(!ed.brush().color.underline);
    }

    // -- Keys ---------------------------------------------------------------

    #[test]
    fn unknown_key() {
        let mut ed = editor();
        press(&mut ed, 'z');
        assert_eq!(ed.notice(), "unknown key 'z'");
        assert_eq!(ed.accumulator(), "z");
    }

    #[test]
    fn notice_clears_on_next_key() {
        let mut ed = editor();
        press(&mut ed, 'z');
        press(&mut ed, 'B');
        assert_eq!(ed.notice(), "");
        assert_eq!(ed.accumulator(), "B");
    }

    #[test]
    fn prefix_waits_for_the_next_key() {
        let mut ed = editor();
        key(&mut ed, KeyCode::Escape, Modifiers::empty());
        assert_eq!(ed.state(), State::AwaitingPrefixContinuation);
        assert_eq!(ed.accumulator(), "^[");

        press(&mut ed, 'z');
        assert_eq!(ed.state(), State::Normal);
        assert_eq!(ed.accumulator(), "^[z");
        assert_eq!(ed.notice(), "unknown key '^[z'");

        press(&mut ed, 'B');
        assert_eq!(ed.accumulator(), "B");
    }

    #[test]
    fn repeated_prefix_keeps_waiting() {
        let mut ed = editor();
        key(&mut ed, KeyCode::Escape, Modifiers::empty());
        key(&mut ed, KeyCode::Escape, Modifiers::empty());
        assert_eq!(ed.state(), State::AwaitingPrefixContinuation);
        assert_eq!(ed.accumulator(), "^[");
        assert_eq!(ed.notice(), "");

        press(&mut ed, 'z');
        assert_eq!(ed.accumulator(), "^[z");
        assert_eq!(ed.state(), State::Normal);
    }

    #[test]
    fn prefixed_key_falls_back_to_bare_binding() {
        let mut ed = editor();
        key(&mut ed, KeyCode::Escape, Modifiers::empty());
        assert_eq!(press(&mut ed, 'q'), Outcome::Quit);
    }

    #[test]
    fn alt_matches_escape_sequence() {
        let mut keymap = Keymap::default();
        keymap.bind("^[x", Command::ToggleColors);
        let mut ed = Editor::new(TileDocument::blank(1, 1), ColorPalette::default(), keymap, Settings::default());
        key(&mut ed, KeyCode::Char('x'), Modifiers::ALT);
        assert_eq!(ed.accumulator(), "^[x");
        assert_eq!(ed.panels_shown(), (true, false));

        key(&mut ed, KeyCode::Escape, Modifiers::empty());
        press(&mut ed, 'x');
        assert_eq!(ed.panels_shown(), (false, false));
    }

    #[test]
    fn session_commands() {
        let mut ed = editor();
        assert_eq!(key(&mut ed, KeyCode::Char('y'), Modifiers::CTRL), Outcome::View);
        assert_eq!(key(&mut ed, KeyCode::Char('l'), Modifiers::CTRL), Outcome::Redraw);
        assert_eq!(press(&mut ed, 'q'), Outcome::Quit);
    }

    // -- Saving -------------------------------------------------------------

    #[test]
    fn save_prompt_starts_from_the_tile_path() {
        let mut doc = sample();
        doc.set_path(PathBuf::from("art.tile"));
        let mut ed = editor_with(doc);

        key(&mut ed, KeyCode::Char('s'), Modifiers::CTRL);
        assert_eq!(ed.prompt().map(Prompt::line).as_deref(), Some("save as: art.tile"));

        let mut surface = FrameBuffer::new(80, 10);
        ed.draw(&mut surface);
        let status: String = (0..80).filter_map(|x| surface.grapheme_at(x, 9)).collect();
        assert!(status.contains("save as: art.tile"), "{status:?}");
        let column = status::NOTICE_COLUMN + 17;
        assert_eq!(ed.screen_cursor(), Some((column, 9)));
    }

    #[test]
    fn save_keeps_the_offered_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("art.tile");
        let mut doc = sample();
        doc.set_path(path.clone());
        let mut ed = editor_with(doc);

        key(&mut ed, KeyCode::Char('s'), Modifiers::CTRL);
        assert_eq!(enter(&mut ed), Outcome::Continue);
        assert!(ed.prompt().is_none());
        assert_eq!(ed.notice(), format!("saved {}", path.display()));
        let reloaded = TileDocument::load(&path).unwrap();
        assert_eq!(reloaded.serialize(), sample().serialize());
    }

    #[test]
    fn save_under_an_edited_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut doc = sample();
        doc.set_path(dir.path().join("art.tile"));
        let mut ed = editor_with(doc);

        key(&mut ed, KeyCode::Char('s'), Modifiers::CTRL);
        for _ in 0.."tile".len() {
            key(&mut ed, KeyCode::Backspace, Modifiers::empty());
        }
        type_text(&mut ed, "2 q");
        enter(&mut ed);

        let renamed = dir.path().join("art.2 q");
        assert_eq!(ed.document().path(), Some(renamed.as_path()));
        assert!(TileDocument::load(&renamed).is_ok());
        assert!(!dir.path().join("art.tile").exists());
    }

    #[test]
    fn prompt_swallows_command_keys() {
        let mut ed = editor();
        key(&mut ed, KeyCode::Char('s'), Modifiers::CTRL);
        assert_eq!(press(&mut ed, 'q'), Outcome::Continue);
        press(&mut ed, 'c');
        assert_eq!(ed.panels_shown(), (false, false));
        assert_eq!(ed.prompt().map(Prompt::input), Some("qc"));
    }

    #[test]
    fn escape_cancels_the_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("art.tile");
        let mut doc = sample();
        doc.set_path(path.clone());
        let mut ed = editor_with(doc);

        key(&mut ed, KeyCode::Char('s'), Modifiers::CTRL);
        key(&mut ed, KeyCode::Escape, Modifiers::empty());
        assert!(ed.prompt().is_none());
        assert_eq!(ed.notice(), "save cancelled");
        assert_eq!(ed.state(), State::Normal);
        assert!(!path.exists());

        assert_eq!(press(&mut ed, 'q'), Outcome::Quit);
    }

    #[test]
    fn empty_name_is_a_notice() {
        let mut ed = editor();
        key(&mut ed, KeyCode::Char('s'), Modifiers::CTRL);
        assert_eq!(ed.prompt().map(Prompt::input), Some(""));
        assert_eq!(enter(&mut ed), Outcome::Continue);
        assert_eq!(ed.notice(), "no file to save to");
        assert!(ed.fatal().is_none());
    }

    #[test]
    fn unwritable_name_is_a_notice() {
        let dir = tempfile::tempdir().unwrap();
        let mut ed = editor();
        key(&mut ed, KeyCode::Char('s'), Modifiers::CTRL);
        type_text(&mut ed, &dir.path().join("missing/art.tile").display().to_string());
        assert_eq!(enter(&mut ed), Outcome::Continue);
        assert!(!ed.notice().is_empty());
        assert!(ed.document().path().is_none());
    }

    #[test]
    fn debug_makes_failures_fatal() {
        let mut ed = Editor::new(TileDocument::blank(1, 1), ColorPalette::default(), Keymap::default(), debug_settings());
        key(&mut ed, KeyCode::Char('s'), Modifiers::CTRL);
        assert_eq!(enter(&mut ed), Outcome::Quit);
        assert!(matches!(ed.fatal(), Some(EditorError::NoPath)));
        assert!(ed.take_fatal().is_some());
        assert!(ed.fatal().is_none());
    }

    // -- Mouse --------------------------------------------------------------

    #[test]
    fn left_click_moves_cursor() {
        let mut ed = editor();
        key(&mut ed, KeyCode::Right, Modifiers::empty());
        ed.handle_gesture(Gesture::new(1, Phase::Click, 3, 2));
        assert_eq!(ed.cursor(), (7, 2));
        assert_eq!(ed.accumulator(), "C1(3, 2)");
    }

    #[test]
    fn left_release_moves_cursor() {
        let mut ed = editor();
        ed.handle_gesture(Gesture::new(1, Phase::Press, 1, 1));
        assert_eq!(ed.state(), State::MouseButtonDown(1));
        ed.handle_gesture(Gesture::new(1, Phase::Release, 5, 3));
        assert_eq!(ed.state(), State::Normal);
        assert_eq!(ed.cursor(), (5, 3));
        assert_eq!(ed.accumulator(), "R1(5, 3)");
    }

    #[test]
    fn non_gestures_are_recorded() {
        let mut ed = editor();
        let drag = MouseEvent {
            kind: MouseEventKind::Drag(MouseButton::Left),
            x: 4,
            y: 2,
            modifiers: Modifiers::empty(),
        };
        ed.handle_mouse(&drag);
        assert_eq!(ed.accumulator(), "Drag1(4, 2)");
        assert_eq!(ed.cursor(), (0, 0));
    }

    #[test]
    fn pick_from_canvas() {
        let mut ed = editor_with(sample());
        let mut surface = FrameBuffer::new(20, 10);
        ed.draw(&mut surface);

        pick_at(&mut ed, 0, 0);
        assert_eq!(ed.brush().ch, "a");
        assert_eq!(ed.brush().color, ColorSpec::parse("196 on 17 bold"));
        assert_eq!(ed.notice(), "char now a");
        assert_eq!(ed.state(), State::Normal);
    }

    #[test]
    fn pick_tiled_copy() {
        let mut ed = editor_with(sample());
        let mut surface = FrameBuffer::new(20, 10);
        ed.draw(&mut surface);
        // Rows repeat every 2, so (1, 3) shows "d".
        pick_at(&mut ed, 1, 3);
        assert_eq!(ed.brush().ch, "d");
        assert!(ed.brush().color.is_plain());
    }

    #[test]
    fn pick_requires_same_cell() {
        let mut ed = editor_with(sample());
        let mut surface = FrameBuffer::new(20, 10);
        ed.draw(&mut surface);

        ed.handle_gesture(Gesture::new(3, Phase::Press, 0, 0));
        ed.handle_gesture(Gesture::new(3, Phase::Release, 1, 0));
        assert_eq!(ed.notice(), "cursor moved");
        assert_eq!(ed.brush(), &Brush::default());
        assert!(ed.fatal().is_none());
    }

    #[test]
    fn pick_requires_same_button() {
        let mut ed = editor_with(sample());
        let mut surface = FrameBuffer::new(20, 10);
        ed.draw(&mut surface);

        ed.handle_gesture(Gesture::new(1, Phase::Press, 0, 0));
        ed.handle_gesture(Gesture::new(3, Phase::Release, 0, 0));
        assert_eq!(ed.notice(), "cursor moved");
        assert_eq!(ed.brush(), &Brush::default());
        assert_eq!(ed.state(), State::Normal);
    }

    #[test]
    fn pick_on_wide_glyph_second_column() {
        let mut ed = editor_with(TileDocument::parse("#C r 5\n#M r \n中b\n").unwrap());
        let mut surface = FrameBuffer::new(20, 10);
        ed.draw(&mut surface);
        pick_at(&mut ed, 1, 0);
        assert_eq!(ed.brush().ch, "中");
        assert_eq!(ed.brush().color, ColorSpec::fg(5));
        assert_eq!(ed.notice(), "char now 中");
    }

    #[test]
    fn pick_without_press_fails() {
        let mut ed = editor_with(sample());
        let mut surface = FrameBuffer::new(20, 10);
        ed.draw(&mut surface);
        ed.handle_gesture(Gesture::new(3, Phase::Release, 0, 0));
        assert_eq!(ed.notice(), "cursor moved");
    }

    #[test]
    fn pick_on_empty_cell() {
        let mut ed = editor_with(sample());
        let mut surface = FrameBuffer::new(20, 10);
        ed.draw(&mut surface);
        // Row 8 sits between the canvas and the status line.
        pick_at(&mut ed, 0, 8);
        assert_eq!(ed.notice(), "no contents there");
        assert_eq!(ed.brush(), &Brush::default());
    }

    #[test]
    fn pick_from_color_browser_takes_color_only() {
        let mut ed = editor_with(sample());
        press(&mut ed, 'c');
        let mut surface = FrameBuffer::new(80, 30);
        ed.draw(&mut surface);

        pick_at(&mut ed, 3, 1);
        assert_eq!(ed.brush().color, ColorSpec::fg(16));
        assert_eq!(ed.brush().ch, " ");
        assert_eq!(ed.notice(), "color now 16");
    }

    #[test]
    fn pick_from_glyph_browser_takes_char_only() {
        let mut ed = editor_with(sample());
        press(&mut ed, 'C');
        let mut surface = FrameBuffer::new(80, 30);
        ed.draw(&mut surface);

        pick_at(&mut ed, 6, 10);
        assert_eq!(ed.brush().ch, "☀");
        assert!(ed.brush().color.is_plain());
        assert_eq!(ed.notice(), "char now ☀");
    }

    #[test]
    fn held_pick_button_underlines_the_cell() {
        let mut ed = editor_with(sample());
        let mut surface = FrameBuffer::new(20, 10);
        ed.handle_gesture(Gesture::new(3, Phase::Press, 1, 1));
        ed.draw(&mut surface);
        assert!(surface.get(1, 1).unwrap().underline.is_underlined());
        assert!(!surface.get(0, 1).unwrap().underline.is_underlined());
    }

    // -- Frame --------------------------------------------------------------

    #[test]
    fn screen_cursor_follows_scroll() {
        let mut ed = editor();
        let mut surface = FrameBuffer::new(20, 10);
        ed.set_cursor(3, 2);
        ed.draw(&mut surface);
        assert_eq!(ed.screen_cursor(), Some((3, 2)));

        ed.set_cursor(-1, 0);
        ed.draw(&mut surface);
        assert_eq!(ed.scroll(), (-1, 0));
        assert_eq!(ed.screen_cursor(), Some((0, 0)));
    }

    #[test]
    fn small_terminal_is_a_notice() {
        let mut ed = editor();
        press(&mut ed, 'c');
        let mut surface = FrameBuffer::new(40, 10);
        ed.draw(&mut surface);
        assert!(ed.notice().starts_with("need a terminal of at least"), "{}", ed.notice());
        assert!(ed.fatal().is_none());

        let mut surface = FrameBuffer::new(80, 30);
        ed.draw(&mut surface);
        assert_eq!(ed.notice(), "");
    }

    #[test]
    fn debug_makes_small_terminal_fatal() {
        let mut ed = Editor::new(TileDocument::blank(8, 4), ColorPalette::default(), Keymap::default(), debug_settings());
        press(&mut ed, 'c');
        ed.draw(&mut FrameBuffer::new(20, 5));
        assert!(matches!(ed.fatal(), Some(EditorError::Render(_))));
        assert!(ed.notice().starts_with("need a terminal of at least"), "{}", ed.notice());
    }

    #[test]
    fn palette_exhaustion_is_fatal() {
        let doc = TileDocument::parse("#C r 1\n#C g 2\n#M rg\nab\n").unwrap();
        let mut ed = Editor::new(doc, ColorPalette::new(1), Keymap::default(), Settings::default());
        let mut surface = FrameBuffer::new(20, 10);
        ed.draw(&mut surface);
        assert!(matches!(ed.fatal(), Some(EditorError::Palette(_))));
    }

    #[test]
    fn snapshot_is_ansi() {
        let ed = editor_with(sample());
        let snapshot = ed.snapshot();
        assert_eq!(snapshot.lines().count(), 2);
        assert!(snapshot.contains("\x1b["));
    }
}
