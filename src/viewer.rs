// SPDX-License-Identifier: MIT
//
// External viewer.
//
// Runs while the event loop has released the terminal. The tile snapshot
// is written to the viewer's stdin from a helper thread so a pager that
// reads lazily cannot deadlock against us; we wait for the viewer, then
// join the writer.

use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::thread;

use anyhow::{Context, Result, bail};

/// Show `snapshot` in `command` (split on whitespace, e.g. `less -R`).
///
/// A viewer that quits before reading everything is fine.
pub fn show(command: &str, snapshot: String) -> Result<()> {
    let mut words = command.split_whitespace();
    let program = words.next().context("viewer command is empty")?;

    let mut child = Command::new(program)
        .args(words)
        .stdin(Stdio::piped())
        .spawn()
        .with_context(|| format!("starting viewer '{command}'"))?;
    let mut stdin = child.stdin.take().context("viewer stdin was not piped")?;

    tracing::debug!(command, bytes = snapshot.len(), "viewer started");
    let writer = thread::spawn(move || stdin.write_all(snapshot.as_bytes()));

    let status = child.wait().context("waiting for the viewer")?;
    match writer.join() {
        Ok(Ok(())) => {}
        Ok(Err(e)) if e.kind() == io::ErrorKind::BrokenPipe => {}
        Ok(Err(e)) => return Err(e).context("feeding the viewer"),
        Err(_) => bail!("viewer writer thread panicked"),
    }

    if !status.success() {
        tracing::warn!(%status, command, "viewer exited with failure");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewer_that_ignores_input() {
        assert!(show("true", "x".repeat(1 << 20)).is_ok());
    }

    #[test]
    fn viewer_that_reads_everything() {
        assert!(show("wc -c", "abc\n".to_owned()).is_ok());
    }

    #[test]
    fn empty_command() {
        let err = show("   ", String::new()).unwrap_err();
        assert_eq!(err.to_string(), "viewer command is empty");
    }

    #[test]
    fn missing_program() {
        let err = show("tilepaint-no-such-viewer", String::new()).unwrap_err();
        assert!(err.to_string().starts_with("starting viewer"), "{err}");
    }
}
