// SPDX-License-Identifier: MIT
//
// tilepaint: paint tiles of colored glyphs in the terminal.
//
// This is the main binary that wires together the crates:
//
//   tp-term   → terminal control, frame diffing, input parsing, event loop
//   tp-tile   → tile documents, the color palette, viewports
//   tp-editor → the editing state machine, panels and status line
//
// Session implements tp-term's App trait around a tp-editor Editor. Each
// input event flows through:
//
//   stdin → parser → on_event → key/mouse dispatch → tile/brush mutation
//   paint → canvas blit + panels + status → framebuffer → diff → terminal
//
// Layout:
//
//   ┌──────────────────────────────┐
//   │ color browser (toggled)      │
//   │ glyph browser (toggled)      │  canvas: h - 2 rows, tiled
//   │ canvas                       │
//   ├──────────────────────────────┤
//   │ (blank)                      │  ← 1 row
//   ├──────────────────────────────┤
//   │ status line                  │  ← 1 row
//   └──────────────────────────────┘

mod config;
mod logging;
mod viewer;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use tp_editor::editor::{Editor, Outcome};
use tp_term::buffer::FrameBuffer;
use tp_term::event_loop::{Action, App, EventLoop};
use tp_term::input::Event;
use tp_tile::document::TileDocument;
use tp_tile::palette::ColorPalette;

use crate::config::{CliArgs, Config};

// ─── App implementation ─────────────────────────────────────────────────────

/// The editor plus what the binary adds around it.
struct Session {
    editor: Editor,
    viewer: String,
}

impl App for Session {
    fn on_event(&mut self, event: &Event) -> Action {
        match self.editor.handle_event(event) {
            Outcome::Continue => Action::Continue,
            Outcome::Redraw => Action::Redraw,
            Outcome::View => Action::Suspend,
            Outcome::Quit => Action::Quit,
        }
    }

    // Notices and the canvas size can change without input.
    fn on_tick(&mut self) -> bool {
        true
    }

    fn paint(&mut self, frame: &mut FrameBuffer) {
        self.editor.draw(frame);
    }

    fn cursor(&self) -> Option<(u16, u16)> {
        self.editor.screen_cursor()
    }

    fn on_suspend(&mut self) {
        if let Err(e) = viewer::show(&self.viewer, self.editor.snapshot()) {
            tracing::error!("viewer failed: {e:#}");
            self.editor.notify(format!("{e:#}"));
        }
    }

    fn finished(&self) -> bool {
        self.editor.fatal().is_some()
    }
}

// ─── Startup ────────────────────────────────────────────────────────────────

/// The document to edit.
///
/// Files are tried in order and the first that loads wins; the others are
/// reported. With no files, a blank tile is created that saves to
/// `new_file`. `None` means every named file failed.
fn open_document(config: &Config, files: &[PathBuf]) -> Option<TileDocument> {
    if files.is_empty() {
        let mut doc = TileDocument::blank(config.new_width, config.new_height);
        doc.set_path(config.new_file.clone());
        return Some(doc);
    }
    let mut opened = None;
    for path in files {
        match TileDocument::load(path) {
            Ok(doc) if opened.is_none() => {
                tracing::info!(path = %path.display(), "opened tile");
                opened = Some(doc);
            }
            Ok(_) => tracing::warn!(path = %path.display(), "only the first tile is edited"),
            Err(e) => {
                eprintln!("tilepaint: {e}");
                tracing::error!("{e}");
            }
        }
    }
    opened
}

fn run() -> Result<ExitCode> {
    let args = CliArgs::parse();
    let config = Config::load_with_args(&args).context("loading configuration")?;

    logging::init(config.log_path().as_deref(), config.debug)?;
    for warning in &config.warnings {
        tracing::warn!("{warning}");
    }

    let keymap = config.keymap()?;
    let Some(doc) = open_document(&config, &args.files) else {
        return Ok(ExitCode::FAILURE);
    };

    let editor = Editor::new(doc, ColorPalette::new(config.max_pairs), keymap, config.settings());
    let mut session = Session {
        editor,
        viewer: config.viewer.clone(),
    };

    let mut event_loop =
        EventLoop::with_config(config.loop_config()).context("initializing the terminal")?;
    event_loop.run(&mut session)?;

    if let Some(e) = session.editor.take_fatal() {
        tracing::error!("stopped: {e}");
        return Err(e.into());
    }
    tracing::info!("bye");
    Ok(ExitCode::SUCCESS)
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    run().unwrap_or_else(|e| {
        eprintln!("tilepaint: {e:#}");
        ExitCode::FAILURE
    })
}

// ─── Tests ──────────────────────────────────────────────────────────────────
