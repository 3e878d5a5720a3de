//! Tile document: the drawing being edited.
//!
//! A tile is a grid of graphemes with a parallel grid of one-character
//! color codes and a small palette mapping each code to a color
//! descriptor. On disk it is plain UTF-8 text:
//!
//! ```text
//! #C r 196 on 0 bold
//! #C b on 4
//! #M rr bb
//! #M r  b
//! ab ▒▒
//! cd ░░
//! ```
//!
//! `#C` lines define palette entries, `#M` lines are color-code rows, and
//! every other non-empty line is a content row. Mask row *i* colors content
//! row *i*. A blank code or a code missing from the palette means "no
//! styling".
//!
//! Rows are indexed modulo the row count (a tile repeats vertically), but
//! columns are used as given: horizontal repetition is the viewport's job.
//! Width and height are fixed once parsed; edits only replace cells.
//!
//! Mask and content rows are checked against each other when the text is
//! parsed, so every later lookup can index both grids safely.

use std::fmt::Write as _;
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use tp_term::ansi;
use tp_term::cell::Attr;
use unicode_segmentation::UnicodeSegmentation;

use crate::descriptor::ColorSpec;
use crate::error::TileError;

const PALETTE_PREFIX: &str = "#C ";
const MASK_PREFIX: &str = "#M ";

/// The code meaning "no styling".
pub const BLANK_CODE: char = ' ';

/// A tile: content graphemes, color-code mask and code palette.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TileDocument {
    rows: Vec<Vec<String>>,
    mask: Vec<Vec<char>>,
    /// Insertion-ordered code → descriptor entries.
    palette: Vec<(char, String)>,
    path: Option<PathBuf>,
}

impl TileDocument {
    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// A `width × height` tile of spaces with no styling.
    #[must_use]
    pub fn blank(width: usize, height: usize) -> Self {
        Self {
            rows: vec![vec![" ".to_owned(); width]; height],
            mask: vec![vec![BLANK_CODE; width]; height],
            palette: Vec::new(),
            path: None,
        }
    }

    /// Parse tile text.
    ///
    /// # Errors
    ///
    /// [`TileError::Format`] when the last line is not newline-terminated,
    /// a `#C` line has no code, or mask and content rows disagree in count
    /// or length.
    pub fn parse(text: &str) -> Result<Self, TileError> {
        if !text.is_empty() && !text.ends_with('\n') {
            return Err(TileError::Format {
                line: text.lines().count(),
                reason: "last line is not newline-terminated".into(),
            });
        }

        let mut doc = Self::default();
        let mut content_lines = Vec::new();
        let mut line_count = 0;

        for (idx, line) in text.split_terminator('\n').enumerate() {
            let line_no = idx + 1;
            line_count = line_no;
            if line.is_empty() {
                continue;
            }

            if let Some(rest) = line.strip_prefix(PALETTE_PREFIX) {
                let mut chars = rest.chars();
                let Some(code) = chars.next() else {
                    return Err(TileError::Format {
                        line: line_no,
                        reason: "palette entry without a color code".into(),
                    });
                };
                doc.define(code, chars.as_str().trim());
            } else if let Some(rest) = line.strip_prefix(MASK_PREFIX) {
                doc.mask.push(rest.chars().collect());
            } else {
                doc.rows.push(line.graphemes(true).map(str::to_owned).collect());
                content_lines.push(line_no);
            }
        }

        if doc.mask.len() != doc.rows.len() {
            return Err(TileError::Format {
                line: line_count,
                reason: format!(
                    "{} color mask rows for {} content rows",
                    doc.mask.len(),
                    doc.rows.len()
                ),
            });
        }

        for ((row, mask), line) in doc.rows.iter().zip(&doc.mask).zip(content_lines) {
            if row.len() != mask.len() {
                return Err(TileError::Format {
                    line,
                    reason: format!(
                        "row has {} cells but its color mask has {} codes",
                        row.len(),
                        mask.len()
                    ),
                });
            }
        }

        Ok(doc)
    }

    /// Read and parse a tile file, remembering its path.
    ///
    /// # Errors
    ///
    /// [`TileError::Io`] if the file cannot be read, or any parse error.
    pub fn load(path: &Path) -> Result<Self, TileError> {
        let text = fs::read_to_string(path).map_err(|source| TileError::Io {
            path: path.to_owned(),
            source,
        })?;
        let mut doc = Self::parse(&text)?;
        doc.path = Some(path.to_owned());
        tracing::info!(
            path = %path.display(),
            width = doc.width(),
            height = doc.height(),
            "loaded tile"
        );
        Ok(doc)
    }

    /// Write the tile to `path` and make that its path.
    ///
    /// # Errors
    ///
    /// [`TileError::Io`] if the file cannot be written.
    pub fn save(&mut self, path: &Path) -> Result<(), TileError> {
        let io_err = |source| TileError::Io {
            path: path.to_owned(),
            source,
        };
        let mut file = fs::File::create(path).map_err(io_err)?;
        file.write_all(self.serialize().as_bytes()).map_err(io_err)?;
        self.path = Some(path.to_owned());
        tracing::info!(path = %path.display(), "saved tile");
        Ok(())
    }

    /// The tile text: palette, then mask rows, then content rows.
    #[must_use]
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for (code, descriptor) in &self.palette {
            let _ = writeln!(out, "{PALETTE_PREFIX}{code} {descriptor}");
        }
        for mask in &self.mask {
            out.push_str(MASK_PREFIX);
            out.extend(mask.iter());
            out.push('\n');
        }
        for row in &self.rows {
            out.extend(row.iter().map(String::as_str));
            out.push('\n');
        }
        out
    }

    // -----------------------------------------------------------------------
    // Metadata
    // -----------------------------------------------------------------------

    /// The file this tile was loaded from or last saved to.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Set the file the tile saves to.
    pub fn set_path(&mut self, path: PathBuf) {
        self.path = Some(path);
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Length of the longest row, in cells.
    #[must_use]
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Cells in the row that `y` wraps onto. 0 for an empty tile.
    #[must_use]
    pub fn row_len(&self, y: i32) -> usize {
        self.wrap_row(y).map_or(0, |row| self.rows[row].len())
    }

    /// Palette entries in insertion order.
    pub fn palette(&self) -> impl Iterator<Item = (char, &str)> {
        self.palette.iter().map(|(code, desc)| (*code, desc.as_str()))
    }

    /// The descriptor behind a code. Empty for blank or unknown codes.
    #[must_use]
    pub fn descriptor(&self, code: char) -> &str {
        if code == BLANK_CODE {
            return "";
        }
        self.palette
            .iter()
            .find(|(c, _)| *c == code)
            .map_or("", |(_, desc)| desc.as_str())
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Grapheme and color code at `(x, y)`.
    ///
    /// `y` wraps around the row count; `x` does not.
    ///
    /// # Errors
    ///
    /// [`TileError::OutOfRange`] if the tile is empty, `x` is negative or
    /// `x` is past the end of the row.
    pub fn cell_at(&self, x: i32, y: i32) -> Result<(&str, char), TileError> {
        let (row, col) = self.locate(x, y)?;
        Ok((self.rows[row][col].as_str(), self.mask[row][col]))
    }

    /// Descriptor of the cell at `(x, y)`.
    ///
    /// # Errors
    ///
    /// [`TileError::OutOfRange`] as for [`cell_at`](Self::cell_at).
    pub fn color_at(&self, x: i32, y: i32) -> Result<&str, TileError> {
        let (_, code) = self.cell_at(x, y)?;
        Ok(self.descriptor(code))
    }

    /// Grapheme and descriptor at an already-wrapped position.
    ///
    /// Used by the compositor, which does its own wrapping.
    #[must_use]
    pub fn cell(&self, col: usize, row: usize) -> Option<(&str, &str)> {
        let grapheme = self.rows.get(row)?.get(col)?;
        let code = *self.mask.get(row)?.get(col)?;
        Some((grapheme.as_str(), self.descriptor(code)))
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Replace the grapheme at `(x, y)`. The color code is untouched.
    ///
    /// # Errors
    ///
    /// [`TileError::OutOfRange`] as for [`cell_at`](Self::cell_at).
    pub fn set_char(&mut self, x: i32, y: i32, grapheme: &str) -> Result<(), TileError> {
        let (row, col) = self.locate(x, y)?;
        grapheme.clone_into(&mut self.rows[row][col]);
        Ok(())
    }

    /// Replace the color code at `(x, y)`.
    ///
    /// # Errors
    ///
    /// [`TileError::OutOfRange`] as for [`cell_at`](Self::cell_at).
    pub fn set_color_code(&mut self, x: i32, y: i32, code: char) -> Result<(), TileError> {
        let (row, col) = self.locate(x, y)?;
        self.mask[row][col] = code;
        Ok(())
    }

    /// Color the cell at `(x, y)` with `descriptor`.
    ///
    /// Reuses the code of an identical palette entry, otherwise claims the
    /// first unused printable ASCII code. An empty descriptor writes the
    /// blank code.
    ///
    /// # Errors
    ///
    /// [`TileError::OutOfRange`] as for [`cell_at`](Self::cell_at), or
    /// [`TileError::CodesExhausted`] when no code is free.
    pub fn set_color(&mut self, x: i32, y: i32, descriptor: &str) -> Result<(), TileError> {
        self.locate(x, y)?;
        let descriptor = descriptor.trim();
        let code = if descriptor.is_empty() {
            BLANK_CODE
        } else {
            self.intern(descriptor)?
        };
        self.set_color_code(x, y, code)
    }

    /// Replace only the foreground of the cell's color.
    ///
    /// # Errors
    ///
    /// As for [`set_color`](Self::set_color).
    pub fn set_fg(&mut self, x: i32, y: i32, fg: Option<u8>) -> Result<(), TileError> {
        self.update_spec(x, y, |spec| spec.fg = fg)
    }

    /// Replace only the background of the cell's color.
    ///
    /// # Errors
    ///
    /// As for [`set_color`](Self::set_color).
    pub fn set_bg(&mut self, x: i32, y: i32, bg: Option<u8>) -> Result<(), TileError> {
        self.update_spec(x, y, |spec| spec.bg = bg)
    }

    /// Replace only the attribute flags of the cell's color.
    ///
    /// # Errors
    ///
    /// As for [`set_color`](Self::set_color).
    pub fn set_attr_flags(
        &mut self,
        x: i32,
        y: i32,
        attrs: Attr,
        underline: bool,
    ) -> Result<(), TileError> {
        self.update_spec(x, y, |spec| {
            spec.attrs = attrs;
            spec.underline = underline;
        })
    }

    fn update_spec(
        &mut self,
        x: i32,
        y: i32,
        change: impl FnOnce(&mut ColorSpec),
    ) -> Result<(), TileError> {
        let mut spec = ColorSpec::parse(self.color_at(x, y)?);
        change(&mut spec);
        self.set_color(x, y, &spec.to_string())
    }

    /// Add or overwrite a palette entry, keeping its original position.
    fn define(&mut self, code: char, descriptor: &str) {
        match self.palette.iter_mut().find(|(c, _)| *c == code) {
            Some((_, existing)) => descriptor.clone_into(existing),
            None => self.palette.push((code, descriptor.to_owned())),
        }
    }

    fn intern(&mut self, descriptor: &str) -> Result<char, TileError> {
        if let Some((code, _)) = self.palette.iter().find(|(_, d)| d == descriptor) {
            return Ok(*code);
        }
        let code = ('!'..='~')
            .find(|c| self.palette.iter().all(|(used, _)| used != c))
            .ok_or(TileError::CodesExhausted)?;
        tracing::debug!(%code, descriptor, "new palette entry");
        self.define(code, descriptor);
        Ok(code)
    }

    // -----------------------------------------------------------------------
    // Indexing
    // -----------------------------------------------------------------------

    fn wrap_row(&self, y: i32) -> Option<usize> {
        let count = i64::try_from(self.rows.len()).ok().filter(|&n| n > 0)?;
        usize::try_from(i64::from(y).rem_euclid(count)).ok()
    }

    fn locate(&self, x: i32, y: i32) -> Result<(usize, usize), TileError> {
        let out_of_range = || TileError::OutOfRange { x, y };
        let row = self.wrap_row(y).ok_or_else(out_of_range)?;
        let col = usize::try_from(x)
            .ok()
            .filter(|&col| col < self.rows[row].len())
            .ok_or_else(out_of_range)?;
        Ok((row, col))
    }

    // -----------------------------------------------------------------------
    // ANSI snapshot
    // -----------------------------------------------------------------------

    /// The tile as SGR-colored text, one line per row.
    ///
    /// Handed to an external pager, which is why it ends every line with a
    /// reset.
    #[must_use]
    pub fn render_ansi(&self) -> String {
        let mut out = Vec::new();
        for (row, mask) in self.rows.iter().zip(&self.mask) {
            let mut current: Option<char> = None;
            for (grapheme, &code) in row.iter().zip(mask) {
                if current != Some(code) {
                    let spec = ColorSpec::parse(self.descriptor(code));
                    ansi::style(
                        &mut out,
                        spec.fg_color(),
                        spec.bg_color(),
                        spec.attrs,
                        spec.underline_style(),
                    )
                    .ok();
                    current = Some(code);
                }
                out.extend_from_slice(grapheme.as_bytes());
            }
            ansi::reset(&mut out).ok();
            out.push(b'\n');
        }
        String::from_utf8_lossy(&out).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    const SAMPLE: &str = "\
#C r 196 on 0 bold
#C b on 4
#M rr b
#M r  b
ab ▒
cd ░
";

    fn sample() -> TileDocument {
        TileDocument::parse(SAMPLE).unwrap()
    }

    // -- Parsing ------------------------------------------------------------

    #[test]
    fn parse_sample() {
        let doc = sample();
        assert_eq!(doc.height(), 2);
        assert_eq!(doc.width(), 4);
        assert_eq!(
            doc.palette().collect::<Vec<_>>(),
            vec![('r', "196 on 0 bold"), ('b', "on 4")]
        );
        assert_eq!(doc.cell_at(3, 0).unwrap(), ("▒", 'b'));
    }

    #[test]
    fn blank_lines_are_skipped() {
        let doc = TileDocument::parse("#M x\n\nq\n\n").unwrap();
        assert_eq!(doc.height(), 1);
        assert_eq!(doc.cell_at(0, 0).unwrap(), ("q", 'x'));
    }

    #[test]
    fn palette_descriptor_is_trimmed() {
        let doc = TileDocument::parse("#C a    red on blue   \n").unwrap();
        assert_eq!(doc.descriptor('a'), "red on blue");
    }

    #[test]
    fn repeated_code_overwrites_in_place() {
        let doc = TileDocument::parse("#C a 1\n#C b 2\n#C a 3\n").unwrap();
        assert_eq!(doc.palette().collect::<Vec<_>>(), vec![('a', "3"), ('b', "2")]);
    }

    #[test]
    fn graphemes_not_codepoints() {
        let doc = TileDocument::parse("#M ab\ne\u{301}x\n").unwrap();
        assert_eq!(doc.row_len(0), 2);
        assert_eq!(doc.cell_at(0, 0).unwrap(), ("e\u{301}", 'a'));
    }

    #[test]
    fn unterminated_text_is_rejected() {
        let err = TileDocument::parse("#M a\nx").unwrap_err();
        assert!(matches!(err, TileError::Format { line: 2, .. }), "{err}");
    }

    #[test]
    fn row_count_mismatch_is_rejected() {
        let err = TileDocument::parse("#M ab\nab\ncd\n").unwrap_err();
        assert!(matches!(err, TileError::Format { .. }));
        assert!(err.to_string().contains("1 color mask rows for 2 content rows"));
    }

    #[test]
    fn row_length_mismatch_names_the_content_line() {
        let err = TileDocument::parse("#M ab\n#M a\nab\ncd\n").unwrap_err();
        assert!(matches!(err, TileError::Format { line: 4, .. }), "{err}");
    }

    #[test]
    fn palette_entry_needs_a_code() {
        let err = TileDocument::parse("#C \n").unwrap_err();
        assert!(matches!(err, TileError::Format { line: 1, .. }));
    }

    #[test]
    fn empty_text_is_an_empty_tile() {
        let doc = TileDocument::parse("").unwrap();
        assert_eq!(doc.height(), 0);
        assert!(matches!(doc.cell_at(0, 0), Err(TileError::OutOfRange { .. })));
    }

    // -- Serialization ------------------------------------------------------

    #[test]
    fn serialize_sample_round_trips() {
        assert_eq!(sample().serialize(), SAMPLE);
    }

    #[test]
    fn serialize_orders_palette_mask_content() {
        let doc = TileDocument::parse("xy\n#M ab\n#C a 1\n").unwrap();
        assert_eq!(doc.serialize(), "#C a 1\n#M ab\nxy\n");
    }

    fn content_row() -> impl Strategy<Value = String> {
        // Rows must not look like palette or mask lines.
        proptest::collection::vec(
            prop_oneof![
                Just("a"),
                Just("Z"),
                Just(" "),
                Just("▒"),
                Just("中"),
                Just("e\u{301}"),
                Just("#"),
            ],
            1..8,
        )
        .prop_map(|cells| format!("x{}", cells.concat()))
    }

    fn tile_text() -> impl Strategy<Value = String> {
        let palette = proptest::collection::btree_map(
            proptest::char::range('!', '~'),
            prop_oneof![Just("1"), Just("7 on 0"), Just("on 4 bold"), Just("red underline")],
            0..5,
        );
        let rows = proptest::collection::vec(content_row(), 1..6);
        (palette, rows).prop_flat_map(|(palette, rows)| {
            let codes: Vec<char> = std::iter::once(' ').chain(palette.keys().copied()).collect();
            let masks: Vec<_> = rows
                .iter()
                .map(|row| {
                    let len = row.graphemes(true).count();
                    proptest::collection::vec(proptest::sample::select(codes.clone()), len)
                })
                .collect();
            (Just(palette), Just(rows), masks)
        })
        .prop_map(|(palette, rows, masks)| {
            let mut text = String::new();
            for (code, desc) in &palette {
                text.push_str(&format!("#C {code} {desc}\n"));
            }
            for mask in &masks {
                text.push_str("#M ");
                text.extend(mask.iter());
                text.push('\n');
            }
            for row in &rows {
                text.push_str(row);
                text.push('\n');
            }
            text
        })
    }

    proptest! {
        #[test]
        fn serialize_inverts_parse(text in tile_text()) {
            let doc = TileDocument::parse(&text).unwrap();
            prop_assert_eq!(doc.serialize(), text);
        }
    }

    // -- Queries ------------------------------------------------------------

    #[test]
    fn rows_wrap_columns_do_not() {
        let doc = sample();
        assert_eq!(doc.cell_at(0, 2).unwrap().0, "a");
        assert_eq!(doc.cell_at(0, -1).unwrap().0, "c");
        assert!(matches!(
            doc.cell_at(4, 0),
            Err(TileError::OutOfRange { x: 4, y: 0 })
        ));
        assert!(matches!(doc.cell_at(-1, 0), Err(TileError::OutOfRange { .. })));
    }

    #[test]
    fn color_at_looks_up_the_palette() {
        let doc = sample();
        assert_eq!(doc.color_at(0, 0).unwrap(), "196 on 0 bold");
        assert_eq!(doc.color_at(2, 0).unwrap(), "");
        assert_eq!(doc.color_at(3, 1).unwrap(), "on 4");
    }

    #[test]
    fn unknown_code_is_unstyled() {
        let doc = TileDocument::parse("#M z\nq\n").unwrap();
        assert_eq!(doc.color_at(0, 0).unwrap(), "");
    }

    #[test]
    fn cell_by_wrapped_index() {
        let doc = sample();
        assert_eq!(doc.cell(0, 1), Some(("c", "196 on 0 bold")));
        assert_eq!(doc.cell(1, 1), Some(("d", "")));
        assert_eq!(doc.cell(9, 1), None);
    }

    // -- Mutation -----------------------------------------------------------

    #[test]
    fn set_char_keeps_color_code() {
        let mut doc = sample();
        for (x, y) in [(0, 0), (3, 1), (1, 0)] {
            let (_, code) = doc.cell_at(x, y).unwrap();
            doc.set_char(x, y, "#").unwrap();
            assert_eq!(doc.cell_at(x, y).unwrap(), ("#", code));
        }
    }

    #[test]
    fn set_char_out_of_range() {
        let mut doc = sample();
        assert!(matches!(
            doc.set_char(7, 0, "#"),
            Err(TileError::OutOfRange { x: 7, y: 0 })
        ));
    }

    #[test]
    fn set_color_reuses_matching_entry() {
        let mut doc = sample();
        doc.set_color(2, 0, "on 4").unwrap();
        assert_eq!(doc.cell_at(2, 0).unwrap().1, 'b');
        assert_eq!(doc.palette().count(), 2);
    }

    #[test]
    fn set_color_allocates_first_free_code() {
        let mut doc = TileDocument::blank(2, 1);
        doc.set_color(0, 0, "3").unwrap();
        doc.set_color(1, 0, "4").unwrap();
        assert_eq!(doc.cell_at(0, 0).unwrap().1, '!');
        assert_eq!(doc.cell_at(1, 0).unwrap().1, '"');
        assert_eq!(doc.color_at(1, 0).unwrap(), "4");
    }

    #[test]
    fn set_color_empty_writes_blank_code() {
        let mut doc = sample();
        doc.set_color(0, 0, "").unwrap();
        assert_eq!(doc.cell_at(0, 0).unwrap().1, BLANK_CODE);
    }

    #[test]
    fn set_fg_keeps_background_and_attrs() {
        let mut doc = sample();
        doc.set_fg(0, 0, Some(46)).unwrap();
        assert_eq!(doc.color_at(0, 0).unwrap(), "46 on 0 bold");
    }

    #[test]
    fn set_bg_on_unstyled_cell() {
        let mut doc = sample();
        doc.set_bg(2, 1, Some(9)).unwrap();
        assert_eq!(doc.color_at(2, 1).unwrap(), "on 9");
    }

    #[test]
    fn set_attr_flags_replaces_all_flags() {
        let mut doc = sample();
        doc.set_attr_flags(0, 0, Attr::empty(), true).unwrap();
        assert_eq!(doc.color_at(0, 0).unwrap(), "196 on 0 underline");
    }

    #[test]
    fn codes_run_out() {
        let mut doc = TileDocument::blank(100, 1);
        for x in 0..94 {
            doc.set_color(x, 0, &x.to_string()).unwrap();
        }
        assert!(matches!(
            doc.set_color(94, 0, "fresh"),
            Err(TileError::CodesExhausted)
        ));
    }

    // -- Files --------------------------------------------------------------

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("art.tile");
        let mut doc = sample();
        doc.save(&path).unwrap();
        assert_eq!(doc.path(), Some(path.as_path()));

        let loaded = TileDocument::load(&path).unwrap();
        assert_eq!(loaded.serialize(), SAMPLE);
        assert_eq!(loaded.path(), Some(path.as_path()));
    }

    #[test]
    fn load_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.tile");
        let err = TileDocument::load(&path).unwrap_err();
        assert!(matches!(err, TileError::Io { .. }));
        assert!(err.to_string().contains("missing.tile"));
    }

    #[test]
    fn blank_document() {
        let doc = TileDocument::blank(3, 2);
        assert_eq!((doc.width(), doc.height()), (3, 2));
        assert_eq!(doc.serialize(), "#M    \n#M    \n   \n   \n");
    }

    // -- ANSI snapshot ------------------------------------------------------

    #[test]
    fn render_ansi_styles_runs() {
        let doc = TileDocument::parse("#C r 1\n#M rr \nab \n").unwrap();
        let out = doc.render_ansi();
        assert_eq!(out, "\x1b[0m\x1b[31mab\x1b[0m \x1b[0m\n");
    }
}
