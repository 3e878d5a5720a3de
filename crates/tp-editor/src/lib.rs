//! # tp-editor: The interactive side of tilepaint
//!
//! - **[`editor`]**: `Editor`, the state machine turning keys and mouse
//!   gestures into tile edits, and the per-frame drawing
//! - **[`keys`]**: key naming (`^S`, `S-Up`, `^[x`)
//! - **[`keymap`]**: the `Command` set and the key → command table
//! - **[`gesture`]**: mouse reports decoded into button gestures
//! - **[`brush`]**: the character and color painting puts down
//! - **[`panels`]**: the color and glyph browsers
//! - **[`status`]**: the bottom status line
//! - **[`prompt`]**: the `save as:` text prompt
//! - **[`error`]**: `EditorError` and pick failures

pub mod brush;
pub mod editor;
pub mod error;
pub mod gesture;
pub mod keymap;
pub mod keys;
pub mod panels;
pub mod prompt;
pub mod status;
