// SPDX-License-Identifier: MIT
//
// The controlling terminal: raw mode, alternate screen, mouse reporting.
//
// Safety: termios, TIOCGWINSZ and isatty have no safe std equivalent, and
// the panic hook writes to fd 1 with libc::write. Each unsafe block wraps
// a single call.
#![allow(unsafe_code)]
//
// A session is a sequence of "screen" phases: the painter owns the
// screen, the external viewer borrows it, the painter takes it back.
// `Terminal::enter` and `Terminal::leave` switch between the two and may be
// called any number of times.
//
// If a panic unwinds through a frame, the hook puts the screen back before
// the message is printed. It cannot reach the `Terminal`, so the saved
// termios also lives in a static, and the reset bytes go straight to fd 1
// to avoid waiting on a stdout lock held by the panicking frame.

use std::io::{self, Write};
#[cfg(unix)]
use std::sync::Mutex;
use std::sync::Once;

use crate::ansi;

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub cols: u16,
    pub rows: u16,
}

impl Size {
    /// Used when the size cannot be queried (not a tty, CI).
    pub const FALLBACK: Self = Self { cols: 80, rows: 24 };

    /// Ask the OS, `None` if stdout is not a terminal.
    #[cfg(unix)]
    #[must_use]
    pub fn query() -> Option<Self> {
        // SAFETY: winsize is plain data and TIOCGWINSZ only writes into it.
        let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
        let rc = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };
        if rc != 0 || ws.ws_col == 0 || ws.ws_row == 0 {
            return None;
        }
        Some(Self {
            cols: ws.ws_col,
            rows: ws.ws_row,
        })
    }

    #[cfg(not(unix))]
    #[must_use]
    pub fn query() -> Option<Self> {
        None
    }
}

// ─── Raw mode ───────────────────────────────────────────────────────────────

/// Termios saved by the last [`RawMode::enable`], for the panic hook.
#[cfg(unix)]
static SAVED_TERMIOS: Mutex<Option<libc::termios>> = Mutex::new(None);

/// Raw mode on stdin. Restores the saved termios on [`restore`](Self::restore).
#[cfg(unix)]
struct RawMode {
    saved: libc::termios,
}

#[cfg(unix)]
impl RawMode {
    /// Switch stdin to raw mode. `None` when stdin is not a terminal.
    fn enable() -> io::Result<Option<Self>> {
        // SAFETY: isatty only inspects the descriptor.
        if unsafe { libc::isatty(libc::STDIN_FILENO) } == 0 {
            return Ok(None);
        }

        // SAFETY: termios is plain data, filled in by tcgetattr.
        let mut saved: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(libc::STDIN_FILENO, &raw mut saved) } != 0 {
            return Err(io::Error::last_os_error());
        }

        let mut termios = saved;
        // SAFETY: cfmakeraw only edits the struct it is given.
        unsafe { libc::cfmakeraw(&raw mut termios) };
        // Blocking single-byte reads; the reader thread polls before reading.
        termios.c_cc[libc::VMIN] = 1;
        termios.c_cc[libc::VTIME] = 0;
        set_termios(&termios)?;

        if let Ok(mut slot) = SAVED_TERMIOS.lock() {
            *slot = Some(saved);
        }
        Ok(Some(Self { saved }))
    }

    fn restore(self) -> io::Result<()> {
        if let Ok(mut slot) = SAVED_TERMIOS.lock() {
            *slot = None;
        }
        set_termios(&self.saved)
    }
}

#[cfg(unix)]
fn set_termios(termios: &libc::termios) -> io::Result<()> {
    // SAFETY: termios points at a valid, initialized struct.
    if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, termios) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

#[cfg(unix)]
fn restore_saved_termios() {
    if let Ok(slot) = SAVED_TERMIOS.lock() {
        if let Some(saved) = slot.as_ref() {
            let _ = set_termios(saved);
        }
    }
}

#[cfg(not(unix))]
const fn restore_saved_termios() {}

#[cfg(not(unix))]
struct RawMode;

#[cfg(not(unix))]
impl RawMode {
    #[allow(clippy::unnecessary_wraps)]
    const fn enable() -> io::Result<Option<Self>> {
        Ok(None)
    }

    #[allow(clippy::unnecessary_wraps, clippy::unused_self)]
    fn restore(self) -> io::Result<()> {
        Ok(())
    }
}

// ─── Panic hook ─────────────────────────────────────────────────────────────

/// Everything `enter` turned on, turned off, alternate screen last.
#[rustfmt::skip]
const PANIC_RESET: &[u8] = b"\
    \x1b[?2026l\
    \x1b[?1006l\x1b[?1000l\
    \x1b[0m\
    \x1b[?25h\
    \x1b[?1049l";

static HOOK: Once = Once::new();

fn install_panic_hook() {
    HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            write_panic_reset();
            restore_saved_termios();
            previous(info);
        }));
    });
}

#[cfg(unix)]
fn write_panic_reset() {
    // SAFETY: the pointer and length describe a static byte string.
    let _ = unsafe {
        libc::write(
            libc::STDOUT_FILENO,
            PANIC_RESET.as_ptr().cast::<libc::c_void>(),
            PANIC_RESET.len(),
        )
    };
}

#[cfg(not(unix))]
fn write_panic_reset() {
    let mut out = io::stdout();
    let _ = out.write_all(PANIC_RESET);
    let _ = out.flush();
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// The screen handle the event loop drives.
///
/// While entered, stdin is raw, the alternate screen is shown with the
/// cursor hidden, and button presses are reported as SGR mouse sequences.
/// Dropping an entered handle leaves.
pub struct Terminal {
    raw: Option<RawMode>,
    size: Size,
    entered: bool,
}

impl Terminal {
    /// A handle sized to the current terminal, or 80×24 if unknown.
    ///
    /// # Errors
    ///
    /// Kept fallible for platforms where opening the terminal can fail.
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            raw: None,
            size: Size::query().unwrap_or(Size::FALLBACK),
            entered: false,
        })
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Query the size again, keeping the old one if the query fails.
    pub fn refresh_size(&mut self) -> Size {
        self.size = Size::query().unwrap_or(self.size);
        self.size
    }

    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.entered
    }

    /// Take over the screen. Does nothing if already entered.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode cannot be set or the setup sequence
    /// cannot be written.
    pub fn enter(&mut self) -> io::Result<()> {
        if self.entered {
            return Ok(());
        }
        install_panic_hook();
        self.raw = RawMode::enable()?;

        let mut out = io::stdout().lock();
        ansi::enter_alt_screen(&mut out)?;
        ansi::cursor_hide(&mut out)?;
        ansi::clear_screen(&mut out)?;
        ansi::enable_mouse(&mut out)?;
        out.flush()?;

        self.entered = true;
        tracing::debug!(cols = self.size.cols, rows = self.size.rows, "screen taken");
        Ok(())
    }

    /// Give the screen back to the shell. Does nothing if not entered.
    ///
    /// # Errors
    ///
    /// Returns an error if the reset sequence cannot be written or the
    /// saved termios cannot be restored.
    pub fn leave(&mut self) -> io::Result<()> {
        if !self.entered {
            return Ok(());
        }
        {
            let mut out = io::stdout().lock();
            ansi::end_sync(&mut out)?;
            ansi::disable_mouse(&mut out)?;
            ansi::reset(&mut out)?;
            ansi::cursor_show(&mut out)?;
            ansi::exit_alt_screen(&mut out)?;
            out.flush()?;
        }
        if let Some(raw) = self.raw.take() {
            raw.restore()?;
        }

        self.entered = false;
        tracing::debug!("screen released");
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.entered {
            let _ = self.leave();
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
