// SPDX-License-Identifier: MIT
//
// Logging setup.
//
// The terminal is in raw mode on the alternate screen for the whole
// session, so log lines go to a file. The filter comes from TILEPAINT_LOG
// (EnvFilter syntax); without it, `warn` and up are kept, or `debug` and up
// with --debug.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the log filter.
pub const FILTER_ENV: &str = "TILEPAINT_LOG";

/// Install the global subscriber writing to `path`.
///
/// Without a path (no cache directory on this platform) nothing is logged.
pub fn init(path: Option<&Path>, debug: bool) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating log directory {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(filter(debug))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .try_init()
        .context("installing the log subscriber")?;

    tracing::info!(path = %path.display(), "logging started");
    Ok(())
}

fn filter(debug: bool) -> EnvFilter {
    EnvFilter::try_from_env(FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "warn" }))
}
