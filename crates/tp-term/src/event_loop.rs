// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Event loop.
//
// Wires the pieces together: stdin bytes arrive from the background reader,
// get parsed into events, the application handles them and paints a frame
// buffer, and the diff renderer writes only what changed.
//
// The loop blocks on the stdin channel with a tick timeout (30 ms by
// default). Input wakes it immediately; otherwise the timeout fires, which
// also resolves a pending lone ESC into the Escape key. Frames are painted
// only when something changed.
//
// Resize arrives as SIGWINCH, which sets an AtomicBool that the loop checks
// every iteration.
//
// Suspend hands the terminal to another program. The reader is stopped so
// it no longer competes for stdin, the terminal leaves raw mode and the
// alternate screen, the application runs its foreground work, and then
// everything is re-entered and redrawn from scratch.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use crate::ansi;
use crate::buffer::FrameBuffer;
use crate::diff::DiffRenderer;
use crate::input::{Event, Parser};
use crate::reader::StdinReader;
use crate::terminal::{Size, Terminal};

// ─── SIGWINCH ────────────────────────────────────────────────────────────────

static SIGWINCH_RECEIVED: AtomicBool = AtomicBool::new(false);

/// The handler only stores to an atomic, which is async-signal-safe.
#[cfg(unix)]
fn install_sigwinch_handler() {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = sigwinch_handler as *const () as usize;
        sa.sa_flags = libc::SA_RESTART;
        libc::sigemptyset(&raw mut sa.sa_mask);
        libc::sigaction(libc::SIGWINCH, &raw const sa, std::ptr::null_mut());
    }
}

#[cfg(unix)]
extern "C" fn sigwinch_handler(_sig: libc::c_int) {
    SIGWINCH_RECEIVED.store(true, Ordering::Relaxed);
}

#[cfg(not(unix))]
fn install_sigwinch_handler() {}

// ─── App Trait ───────────────────────────────────────────────────────────────

/// What the application tells the event loop to do after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Keep running.
    Continue,
    /// Exit the event loop.
    Quit,
    /// Discard the previous frame and repaint everything.
    Redraw,
    /// Hand the terminal over, call [`App::on_suspend`], then resume.
    Suspend,
}

/// Application interface for the event loop.
///
/// Per iteration the loop calls [`on_event`](App::on_event) for each parsed
/// event, [`on_resize`](App::on_resize) after SIGWINCH, [`on_tick`](App::on_tick),
/// and then [`paint`](App::paint) and [`cursor`](App::cursor) if the frame is
/// dirty. [`finished`](App::finished) is checked at the top of every
/// iteration. Only `paint` is required.
pub trait App {
    /// Handle a parsed input event.
    fn on_event(&mut self, _event: &Event) -> Action {
        Action::Continue
    }

    /// The terminal was resized. The frame buffer is already resized.
    fn on_resize(&mut self, _size: Size) {}

    /// Called every iteration, input or not. Return `true` to repaint.
    fn on_tick(&mut self) -> bool {
        false
    }

    /// Paint the current state. The buffer is cleared before each call.
    fn paint(&mut self, buf: &mut FrameBuffer);

    /// Where to show the hardware cursor after painting, or `None` to hide it.
    fn cursor(&self) -> Option<(u16, u16)> {
        None
    }

    /// Foreground work while the terminal is released.
    ///
    /// Runs after the terminal has left raw mode and the alternate screen,
    /// with the stdin reader stopped.
    fn on_suspend(&mut self) {}

    /// Return `true` to leave the loop at the start of the next iteration.
    ///
    /// Lets the app stop on conditions found outside `on_event`, such as
    /// an error raised while painting.
    fn finished(&self) -> bool {
        false
    }
}

// ─── Frame Loop Config ───────────────────────────────────────────────────────

/// Event loop timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopConfig {
    /// Channel receive timeout in microseconds. Doubles as the tick rate
    /// and the lone-ESC timeout.
    pub tick_interval_us: u64,
}

impl LoopConfig {
    /// A config ticking every `ms` milliseconds.
    #[must_use]
    pub const fn from_millis(ms: u64) -> Self {
        Self {
            tick_interval_us: ms * 1000,
        }
    }
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self::from_millis(30)
    }
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

/// Why the inner loop returned.
enum Exit {
    Quit,
    Suspend,
}

/// The terminal event loop.
///
/// Owns the terminal, parser and renderer. [`run`](Self::run) returns when
/// the application answers [`Action::Quit`] or stdin closes.
///
/// ```no_run
/// use tp_term::buffer::FrameBuffer;
/// use tp_term::event_loop::{Action, App, EventLoop};
/// use tp_term::input::{Event, KeyCode, KeyEvent};
///
/// struct Quitter;
///
/// impl App for Quitter {
///     fn on_event(&mut self, event: &Event) -> Action {
///         if let Event::Key(KeyEvent { code: KeyCode::Char('q'), .. }) = event {
///             return Action::Quit;
///         }
///         Action::Continue
///     }
///
///     fn paint(&mut self, _buf: &mut FrameBuffer) {}
/// }
///
/// let mut event_loop = EventLoop::new()?;
/// event_loop.run(&mut Quitter)?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct EventLoop {
    terminal: Terminal,
    parser: Parser,
    renderer: DiffRenderer,
    config: LoopConfig,
}

impl EventLoop {
    /// Create an event loop with the default 30 ms tick.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be initialized.
    pub fn new() -> io::Result<Self> {
        Self::with_config(LoopConfig::default())
    }

    /// Create an event loop with custom timing.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be initialized.
    pub fn with_config(config: LoopConfig) -> io::Result<Self> {
        Ok(Self {
            terminal: Terminal::new()?,
            parser: Parser::new(),
            renderer: DiffRenderer::new(),
            config,
        })
    }

    /// The current terminal size.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.terminal.size()
    }

    /// Run until the application returns [`Action::Quit`].
    ///
    /// The terminal is restored on exit even when the loop fails.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal enter/leave, the reader thread or
    /// rendering fails.
    pub fn run(&mut self, app: &mut impl App) -> io::Result<()> {
        self.terminal.enter()?;
        install_sigwinch_handler();

        loop {
            let (mut reader, rx) = match StdinReader::spawn() {
                Ok(spawned) => spawned,
                Err(e) => {
                    self.terminal.leave()?;
                    return Err(e);
                }
            };

            let result = self.run_inner(app, &rx);
            reader.stop();

            match result {
                Ok(Exit::Suspend) => {
                    tracing::debug!("suspending terminal");
                    self.terminal.leave()?;
                    app.on_suspend();
                    self.terminal.enter()?;
                    self.terminal.refresh_size();
                    self.parser = Parser::new();
                    self.renderer.force_redraw();
                    tracing::debug!("terminal resumed");
                }
                Ok(Exit::Quit) => return self.terminal.leave(),
                Err(e) => {
                    self.terminal.leave()?;
                    return Err(e);
                }
            }
        }
    }

    fn run_inner(&mut self, app: &mut impl App, rx: &Receiver<Vec<u8>>) -> io::Result<Exit> {
        let size = self.terminal.size();
        let mut frame = FrameBuffer::new(size.cols, size.rows);
        let mut dirty = true;
        let timeout = Duration::from_micros(self.config.tick_interval_us);

        loop {
            if app.finished() {
                return Ok(Exit::Quit);
            }

            let events = match rx.recv_timeout(timeout) {
                Ok(bytes) => self.parser.advance(&bytes),
                Err(RecvTimeoutError::Timeout) if self.parser.has_pending() => self.parser.flush(),
                Err(RecvTimeoutError::Timeout) => Vec::new(),
                Err(RecvTimeoutError::Disconnected) => {
                    tracing::debug!("stdin closed");
                    return Ok(Exit::Quit);
                }
            };

            for event in &events {
                match app.on_event(event) {
                    Action::Continue => {}
                    Action::Quit => return Ok(Exit::Quit),
                    Action::Suspend => return Ok(Exit::Suspend),
                    Action::Redraw => self.renderer.force_redraw(),
                }
            }
            if !events.is_empty() {
                dirty = true;
            }

            if SIGWINCH_RECEIVED.swap(false, Ordering::Relaxed) {
                let new_size = self.terminal.refresh_size();
                frame.resize(new_size.cols, new_size.rows);
                self.renderer.force_redraw();
                app.on_resize(new_size);
                tracing::debug!(cols = new_size.cols, rows = new_size.rows, "resized");
                dirty = true;
            }

            if app.on_tick() {
                dirty = true;
            }

            if dirty {
                frame.clear();
                app.paint(&mut frame);
                self.renderer.render(&frame);
                self.renderer.flush()?;

                let stdout = io::stdout();
                let mut lock = stdout.lock();
                if let Some((x, y)) = app.cursor() {
                    ansi::cursor_to(&mut lock, x, y)?;
                    ansi::cursor_show(&mut lock)?;
                } else {
                    ansi::cursor_hide(&mut lock)?;
                }
                lock.flush()?;

                dirty = false;
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
