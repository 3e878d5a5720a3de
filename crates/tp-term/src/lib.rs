// SPDX-License-Identifier: MIT
//
// tp-term: the terminal surface tilepaint draws on.
//
// A small terminal backend: a grid of styled cells with a side table for
// multi-codepoint graphemes, a differential renderer that only emits the
// cells that changed, an input parser for keys and SGR mouse reports, and
// a poll-driven event loop that can hand the terminal to another program
// and take it back.
//
// Terminal control is done directly with ANSI escape sequences and raw
// termios. Colors are the 256-color palette plus the terminal default,
// which is all a tile needs.

pub mod ansi;
pub mod buffer;
pub mod cell;
pub mod color;
pub mod diff;
pub mod event_loop;
pub mod input;
pub mod output;
pub mod reader;
pub mod terminal;
