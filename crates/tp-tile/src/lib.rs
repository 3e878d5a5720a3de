//! # tp-tile: Tiles and how they reach the screen
//!
//! - **[`descriptor`]**: `ColorSpec`, the parsed form of a color descriptor
//!   like `"196 on 17 bold"`
//! - **[`palette`]**: `ColorPalette`, the curses-style pair allocator that
//!   turns descriptors into drawable styles
//! - **[`document`]**: `TileDocument`: the grapheme grid, color-code mask
//!   and code palette, with the text file format
//! - **[`layout`]**: grapheme placement and justification for text fields
//! - **[`viewport`]**: `Viewport`, a screen rectangle that erases, draws
//!   borders and text, tiles a document and remembers what it drew
//! - **[`error`]**: error types for all of the above

pub mod descriptor;
pub mod document;
pub mod error;
pub mod layout;
pub mod palette;
pub mod viewport;
