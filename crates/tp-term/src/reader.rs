// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Background stdin reader.
//
// Raw bytes are forwarded over a channel so the event loop can wait on
// input and its tick timer at once. The thread polls stdin with a short
// timeout and looks at a stop flag between polls. It has to stop, and
// release stdin, before the terminal is handed to the external viewer;
// a fresh reader is spawned when the painter takes the screen back.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

/// Stop-flag check interval.
const POLL_MS: i32 = 20;

/// Handle to the reader thread. Dropping it stops the thread.
pub struct StdinReader {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl StdinReader {
    /// Start reading. The receiver yields chunks as they arrive and closes
    /// when the thread ends (stop, EOF or read error).
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn() -> io::Result<(Self, Receiver<Vec<u8>>)> {
        let (tx, rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let thread = thread::Builder::new()
            .name("tp-stdin".into())
            .spawn(move || forward(&tx, &flag))?;
        Ok((
            Self {
                stop,
                thread: Some(thread),
            },
            rx,
        ))
    }

    /// Stop the thread and wait for it. Safe to call twice.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        let Some(thread) = self.thread.take() else {
            return;
        };
        if thread.join().is_err() {
            tracing::warn!("stdin reader panicked");
        }
    }
}

impl Drop for StdinReader {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Thread body: read until stopped, at EOF, or when nobody listens.
fn forward(tx: &Sender<Vec<u8>>, stop: &AtomicBool) {
    let mut buf = [0u8; 4096];
    while !stop.load(Ordering::Relaxed) {
        match read_chunk(&mut buf) {
            Ok(Some(0)) | Err(_) => break,
            Ok(Some(n)) => {
                if tx.send(buf[..n].to_vec()).is_err() {
                    break;
                }
            }
            Ok(None) => {}
        }
    }
    tracing::debug!("stdin reader finished");
}

/// One read. `Ok(None)` when nothing arrived within the poll interval.
#[cfg(unix)]
fn read_chunk(buf: &mut [u8]) -> io::Result<Option<usize>> {
    let mut pfd = libc::pollfd {
        fd: libc::STDIN_FILENO,
        events: libc::POLLIN,
        revents: 0,
    };
    // SAFETY: one valid pollfd.
    let ready = unsafe { libc::poll(&raw mut pfd, 1, POLL_MS) };
    if ready < 0 {
        let err = io::Error::last_os_error();
        return if err.kind() == io::ErrorKind::Interrupted {
            Ok(None)
        } else {
            Err(err)
        };
    }
    if ready == 0 {
        return Ok(None);
    }

    // SAFETY: buf is valid for buf.len() bytes.
    let n = unsafe { libc::read(libc::STDIN_FILENO, buf.as_mut_ptr().cast(), buf.len()) };
    if n < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(Some(n.unsigned_abs()))
}

/// Blocking read; the stop flag is only seen after the next input.
#[cfg(not(unix))]
fn read_chunk(buf: &mut [u8]) -> io::Result<Option<usize>> {
    use std::io::Read;
    io::stdin().lock().read(buf).map(Some)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
