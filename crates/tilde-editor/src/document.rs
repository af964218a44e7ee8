//! The ordered lines of one file, with editing, load and save.
//!
//! A `Document` owns its [`Row`]s, an unsaved-change counter, an optional
//! filename, and the syntax profile picked from that filename. Rows are
//! indexed `0..numrows` with no gaps.
//!
//! # Mutations
//!
//! Every mutation is a no-op on out-of-range indices and re-derives only the
//! rows it touches. Each successful change bumps `dirty`; loading and saving
//! reset it to zero.
//!
//! # On-disk format
//!
//! [`serialize`](Document::serialize) writes every row followed by a single
//! `\n`. Loading strips the `\n` (and one `\r` before it) from each line, so
//! a file that ends in a newline round-trips exactly.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::row::Row;
use crate::syntax::{self, Syntax};

/// The text being edited.
#[derive(Default)]
pub struct Document {
    rows: Vec<Row>,
    dirty: usize,
    filename: Option<PathBuf>,
    syntax: Option<&'static Syntax>,
}

impl Document {
    // -- Construction -------------------------------------------------------

    /// An empty, unnamed document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A document holding `lines`, with no filename and `dirty == 0`.
    #[must_use]
    pub fn from_lines<I, L>(lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Vec<u8>>,
    {
        Self {
            rows: lines.into_iter().map(|l| Row::new(l.into(), None)).collect(),
            ..Self::default()
        }
    }

    /// Load `path`, pick its syntax profile, and start clean.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        let mut doc = Self::new();
        doc.set_filename(path.to_path_buf());
        doc.rows = split_lines(&bytes)
            .map(|line| Row::new(line.to_vec(), doc.syntax))
            .collect();

        tracing::info!(
            path = %path.display(),
            rows = doc.rows.len(),
            filetype = doc.filetype(),
            "opened file"
        );
        Ok(doc)
    }

    // -- Accessors ----------------------------------------------------------

    /// Number of rows.
    #[inline]
    #[must_use]
    pub fn numrows(&self) -> usize {
        self.rows.len()
    }

    /// Row `at`, if it exists.
    #[inline]
    #[must_use]
    pub fn row(&self, at: usize) -> Option<&Row> {
        self.rows.get(at)
    }

    /// All rows in order.
    #[inline]
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Length of row `at`, or 0 for the virtual row past the end.
    #[must_use]
    pub fn row_len(&self, at: usize) -> usize {
        self.rows.get(at).map_or(0, Row::len)
    }

    /// Number of changes since load or the last save.
    #[inline]
    #[must_use]
    pub const fn dirty(&self) -> usize {
        self.dirty
    }

    /// Whether there are unsaved changes.
    #[inline]
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty > 0
    }

    /// The file this document saves to.
    #[inline]
    #[must_use]
    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    /// The active syntax profile.
    #[inline]
    #[must_use]
    pub const fn syntax(&self) -> Option<&'static Syntax> {
        self.syntax
    }

    /// The profile's filetype name, or `"text"`.
    #[must_use]
    pub fn filetype(&self) -> &'static str {
        self.syntax.map_or("text", |s| s.filetype)
    }

    // -- Metadata -----------------------------------------------------------

    /// Set the filename and re-pick the syntax profile from it.
    pub fn set_filename(&mut self, path: PathBuf) {
        let syntax = syntax::select(&path.to_string_lossy());
        self.filename = Some(path);
        self.set_syntax(syntax);
    }

    /// Switch the syntax profile and re-highlight every row.
    pub fn set_syntax(&mut self, syntax: Option<&'static Syntax>) {
        if self.syntax != syntax {
            tracing::debug!(filetype = syntax.map_or("text", |s| s.filetype), "syntax selected");
        }
        self.syntax = syntax;
        for row in &mut self.rows {
            row.rehighlight(syntax);
        }
    }

    // -- Line operations ----------------------------------------------------

    /// Insert a new row holding `chars` at index `at` (`at == numrows`
    /// appends). Out-of-range `at` is ignored.
    pub fn insert_row(&mut self, at: usize, chars: Vec<u8>) {
        if at > self.rows.len() {
            return;
        }
        self.rows.insert(at, Row::new(chars, self.syntax));
        self.dirty += 1;
    }

    /// Remove row `at`. Out-of-range `at` is ignored.
    pub fn delete_row(&mut self, at: usize) {
        if at >= self.rows.len() {
            return;
        }
        self.rows.remove(at);
        self.dirty += 1;
    }

    /// Insert byte `c` at `(row, col)`. Typing on the virtual row past the
    /// end first appends an empty row. `col` is clamped to the row length.
    pub fn insert_char(&mut self, row: usize, col: usize, c: u8) {
        if row == self.rows.len() {
            self.insert_row(row, Vec::new());
        }
        let syntax = self.syntax;
        if let Some(r) = self.rows.get_mut(row) {
            r.insert_byte(col, c, syntax);
            self.dirty += 1;
        }
    }

    /// Delete the byte at `(row, col)`. No-op unless `col < len(row)`.
    pub fn delete_char(&mut self, row: usize, col: usize) {
        let syntax = self.syntax;
        if let Some(r) = self.rows.get_mut(row) {
            if r.delete_byte(col, syntax) {
                self.dirty += 1;
            }
        }
    }

    /// Break row `row` at `col`: the tail becomes a new row below.
    ///
    /// At `col == 0` this inserts an empty row above, which leaves the same
    /// text. On the virtual row it appends an empty row. The cursor belongs
    /// at `(row + 1, 0)` afterwards.
    pub fn split_line(&mut self, row: usize, col: usize) {
        if col == 0 {
            self.insert_row(row, Vec::new());
            return;
        }
        let syntax = self.syntax;
        let Some(r) = self.rows.get_mut(row) else {
            return;
        };
        let tail = r.split_off(col, syntax);
        self.insert_row(row + 1, tail);
    }

    /// Append row `row` to the row above it and remove it.
    ///
    /// Returns the length the row above had before the join, which is where
    /// the cursor goes. `None` (no change) for row 0 or an out-of-range row.
    pub fn join_with_previous(&mut self, row: usize) -> Option<usize> {
        if row == 0 || row >= self.rows.len() {
            return None;
        }
        let syntax = self.syntax;
        let moved = self.rows.remove(row);
        let prev = &mut self.rows[row - 1];
        let at = prev.len();
        prev.append(moved.chars(), syntax);
        self.dirty += 2;
        Some(at)
    }

    /// Backspace at `(row, col)`: delete the byte before the cursor, or
    /// join with the previous row at column 0.
    ///
    /// Returns the new cursor position, or `None` when there is nothing to
    /// delete (start of the document, or the virtual row).
    pub fn delete_before(&mut self, row: usize, col: usize) -> Option<(usize, usize)> {
        if row >= self.rows.len() || (row == 0 && col == 0) {
            return None;
        }
        if col > 0 {
            self.delete_char(row, col - 1);
            Some((row, col - 1))
        } else {
            self.join_with_previous(row).map(|at| (row - 1, at))
        }
    }

    // -- File I/O -----------------------------------------------------------

    /// Every row followed by `\n`.
    #[must_use]
    pub fn serialize(&self) -> Vec<u8> {
        let total = self.rows.iter().map(|r| r.len() + 1).sum();
        let mut out = Vec::with_capacity(total);
        for row in &self.rows {
            out.extend_from_slice(row.chars());
            out.push(b'\n');
        }
        out
    }

    /// Write to the document's filename, truncating it. Returns the number
    /// of bytes written and clears `dirty`.
    ///
    /// # Errors
    ///
    /// [`Error::NoFilename`] if no filename is set, or the I/O error. On
    /// error `dirty` is unchanged.
    pub fn save(&mut self) -> Result<usize> {
        let path = self.filename.as_deref().ok_or(Error::NoFilename)?;
        let bytes = self.serialize();
        write_file(path, &bytes)?;

        tracing::info!(path = %path.display(), bytes = bytes.len(), "saved file");
        self.dirty = 0;
        Ok(bytes.len())
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("rows", &self.rows.len())
            .field("dirty", &self.dirty)
            .field("filename", &self.filename)
            .field("filetype", &self.filetype())
            .finish()
    }
}

/// Split file contents into lines without their `\n` or trailing `\r`.
/// A final newline does not start an extra empty line.
fn split_lines(bytes: &[u8]) -> impl Iterator<Item = &[u8]> {
    let body = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    let mut lines = body.split(|&b| b == b'\n');
    if bytes.is_empty() {
        // `split` on an empty slice yields one empty line.
        lines.next();
    }
    lines.map(|line| line.strip_suffix(b"\r").unwrap_or(line))
}

/// Create-or-truncate `path` and write `bytes`.
fn write_file(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }
    let mut file = options.open(path)?;
    file.write_all(bytes)?;
    file.flush()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lines(doc: &Document) -> Vec<String> {
        doc.rows()
            .iter()
            .map(|r| String::from_utf8_lossy(r.chars()).into_owned())
            .collect()
    }

    fn doc(text: &[&str]) -> Document {
        Document::from_lines(text.iter().map(|s| s.as_bytes().to_vec()))
    }

    // -- Construction ---------------------------------------------------------

    #[test]
    fn new_is_empty_and_clean() {
        let d = Document::new();
        assert_eq!(d.numrows(), 0);
        assert!(!d.is_dirty());
        assert_eq!(d.filename(), None);
        assert_eq!(d.filetype(), "text");
    }

    #[test]
    fn from_lines_is_clean() {
        let d = doc(&["a", "b"]);
        assert_eq!(d.numrows(), 2);
        assert_eq!(d.dirty(), 0);
    }

    // -- Line splitting -------------------------------------------------------

    #[test]
    fn split_lines_variants() {
        let split = |b: &[u8]| split_lines(b).map(<[u8]>::to_vec).collect::<Vec<_>>();
        assert_eq!(split(b""), Vec::<Vec<u8>>::new());
        assert_eq!(split(b"\n"), vec![b"".to_vec()]);
        assert_eq!(split(b"a\nb\n"), vec![b"a".to_vec(), b"b".to_vec()]);
        assert_eq!(split(b"a\nb"), vec![b"a".to_vec(), b"b".to_vec()]);
        assert_eq!(split(b"a\r\n\r\nb\r\n"), vec![b"a".to_vec(), b"".to_vec(), b"b".to_vec()]);
        assert_eq!(split(b"a\n\n"), vec![b"a".to_vec(), b"".to_vec()]);
    }

    // -- insert_row / delete_row ----------------------------------------------

    #[test]
    fn insert_row_shifts_later_rows() {
        let mut d = doc(&["a", "c"]);
        d.insert_row(1, b"b".to_vec());
        assert_eq!(lines(&d), vec!["a", "b", "c"]);
        assert_eq!(d.dirty(), 1);
    }

    #[test]
    fn insert_row_at_end_appends() {
        let mut d = doc(&["a"]);
        d.insert_row(1, b"b".to_vec());
        assert_eq!(lines(&d), vec!["a", "b"]);
    }

    #[test]
    fn insert_row_out_of_range_is_noop() {
        let mut d = doc(&["a"]);
        d.insert_row(5, b"x".to_vec());
        assert_eq!(lines(&d), vec!["a"]);
        assert_eq!(d.dirty(), 0);
    }

    #[test]
    fn delete_row_shifts_up() {
        let mut d = doc(&["a", "b", "c"]);
        d.delete_row(1);
        assert_eq!(lines(&d), vec!["a", "c"]);
        d.delete_row(9);
        assert_eq!(lines(&d), vec!["a", "c"]);
        assert_eq!(d.dirty(), 1);
    }

    // -- insert_char / delete_char --------------------------------------------

    #[test]
    fn insert_char_mid_line() {
        let mut d = doc(&["ac"]);
        d.insert_char(0, 1, b'b');
        assert_eq!(lines(&d), vec!["abc"]);
        assert!(d.is_dirty());
    }

    #[test]
    fn insert_char_on_virtual_row_appends_line() {
        let mut d = doc(&["a"]);
        d.insert_char(1, 0, b'z');
        assert_eq!(lines(&d), vec!["a", "z"]);
    }

    #[test]
    fn insert_char_into_empty_document() {
        let mut d = Document::new();
        d.insert_char(0, 0, b'x');
        assert_eq!(lines(&d), vec!["x"]);
    }

    #[test]
    fn insert_char_clamps_column() {
        let mut d = doc(&["ab"]);
        d.insert_char(0, 40, b'c');
        assert_eq!(lines(&d), vec!["abc"]);
    }

    #[test]
    fn insert_char_far_past_end_is_noop() {
        let mut d = doc(&["a"]);
        d.insert_char(3, 0, b'z');
        assert_eq!(lines(&d), vec!["a"]);
        assert_eq!(d.dirty(), 0);
    }

    #[test]
    fn delete_char_bounds() {
        let mut d = doc(&["abc"]);
        d.delete_char(0, 3);
        d.delete_char(2, 0);
        assert_eq!(d.dirty(), 0);
        d.delete_char(0, 1);
        assert_eq!(lines(&d), vec!["ac"]);
        assert_eq!(d.dirty(), 1);
    }

    // -- split_line / join_with_previous --------------------------------------

    #[test]
    fn split_line_mid() {
        let mut d = doc(&["hello world"]);
        d.split_line(0, 5);
        assert_eq!(lines(&d), vec!["hello", " world"]);
    }

    #[test]
    fn split_line_at_start_inserts_empty_above() {
        let mut d = doc(&["abc"]);
        d.split_line(0, 0);
        assert_eq!(lines(&d), vec!["", "abc"]);
    }

    #[test]
    fn split_line_at_end_inserts_empty_below() {
        let mut d = doc(&["abc"]);
        d.split_line(0, 3);
        assert_eq!(lines(&d), vec!["abc", ""]);
    }

    #[test]
    fn split_then_join_restores_line() {
        for col in 0..=6 {
            let mut d = doc(&["x", "tilde!", "y"]);
            d.split_line(1, col);
            d.join_with_previous(2);
            assert_eq!(lines(&d), vec!["x", "tilde!", "y"], "col={col}");
        }
    }

    #[test]
    fn join_with_previous_returns_old_length() {
        let mut d = doc(&["ab", "cd"]);
        assert_eq!(d.join_with_previous(1), Some(2));
        assert_eq!(lines(&d), vec!["abcd"]);
    }

    #[test]
    fn join_first_row_is_noop() {
        let mut d = doc(&["ab"]);
        assert_eq!(d.join_with_previous(0), None);
        assert_eq!(d.join_with_previous(1), None);
        assert_eq!(d.dirty(), 0);
    }

    // -- delete_before --------------------------------------------------------

    #[test]
    fn backspace_at_line_start_joins() {
        let mut d = doc(&["ab", "cd"]);
        assert_eq!(d.delete_before(1, 0), Some((0, 2)));
        assert_eq!(lines(&d), vec!["abcd"]);
    }

    #[test]
    fn backspace_mid_line() {
        let mut d = doc(&["abc"]);
        assert_eq!(d.delete_before(0, 2), Some((0, 1)));
        assert_eq!(lines(&d), vec!["ac"]);
    }

    #[test]
    fn backspace_at_origin_and_virtual_row() {
        let mut d = doc(&["abc"]);
        assert_eq!(d.delete_before(0, 0), None);
        assert_eq!(d.delete_before(1, 0), None);
        assert_eq!(lines(&d), vec!["abc"]);
    }

    // -- Derived state --------------------------------------------------------

    #[test]
    fn highlight_matches_render_after_every_edit() {
        let mut d = doc(&["\tint x = 1; // c", "\"s\\\"\""]);
        d.set_syntax(syntax::select("a.c"));
        let check = |d: &Document| {
            for r in d.rows() {
                assert_eq!(r.hl().len(), r.render().len());
            }
        };
        check(&d);
        d.insert_char(0, 3, b'\t');
        check(&d);
        d.split_line(0, 6);
        check(&d);
        d.join_with_previous(1);
        check(&d);
        d.delete_char(1, 0);
        check(&d);
        d.delete_before(1, 0);
        check(&d);
    }

    #[test]
    fn set_filename_selects_syntax_and_rehighlights() {
        let mut d = doc(&["int x;"]);
        assert_eq!(d.row(0).unwrap().hl()[0], crate::syntax::Highlight::Normal);
        d.set_filename(PathBuf::from("prog.c"));
        assert_eq!(d.filetype(), "c");
        assert_eq!(d.row(0).unwrap().hl()[0], crate::syntax::Highlight::Keyword2);
    }

    // -- serialize ------------------------------------------------------------

    #[test]
    fn serialize_appends_newline_to_each_row() {
        assert_eq!(doc(&["a", "", "b"]).serialize(), b"a\n\nb\n");
        assert_eq!(Document::new().serialize(), b"");
    }

    // -- File I/O -------------------------------------------------------------

    #[test]
    fn save_and_open_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roundtrip.txt");

        let mut d = doc(&["hello", "\tworld", ""]);
        d.insert_char(0, 5, b'!');
        d.set_filename(path.clone());
        assert_eq!(d.save().unwrap(), 15);
        assert!(!d.is_dirty());

        let loaded = Document::open(&path).unwrap();
        assert_eq!(lines(&loaded), vec!["hello!", "\tworld", ""]);
        assert!(!loaded.is_dirty());
        assert_eq!(loaded.filename(), Some(path.as_path()));
    }

    #[test]
    fn save_truncates_longer_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.txt");
        fs::write(&path, "a much longer previous content\n").unwrap();

        let mut d = doc(&["short"]);
        d.set_filename(path.clone());
        d.save().unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"short\n");
    }

    #[cfg(unix)]
    #[test]
    fn new_file_gets_mode_0644() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.txt");
        let mut d = doc(&["x"]);
        d.set_filename(path.clone());
        d.save().unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o600, 0o600);
        assert_eq!(mode & 0o111, 0);
    }

    #[test]
    fn save_without_filename_errors() {
        let mut d = doc(&["x"]);
        d.insert_char(0, 0, b'y');
        assert!(matches!(d.save(), Err(Error::NoFilename)));
        assert!(d.is_dirty());
    }

    #[test]
    fn save_failure_keeps_dirty() {
        let dir = tempfile::tempdir().unwrap();
        let mut d = doc(&["x"]);
        d.insert_char(0, 0, b'y');
        d.set_filename(dir.path().join("missing_dir").join("f.txt"));
        assert!(matches!(d.save(), Err(Error::Io(_))));
        assert!(d.is_dirty());
    }

    #[test]
    fn open_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Document::open(&dir.path().join("nope.txt")).is_err());
    }

    #[test]
    fn open_selects_syntax_and_strips_crlf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.c");
        fs::write(&path, "int main() {\r\n\treturn 0;\r\n}\r\n").unwrap();

        let d = Document::open(&path).unwrap();
        assert_eq!(d.filetype(), "c");
        assert_eq!(lines(&d), vec!["int main() {", "\treturn 0;", "}"]);
    }

    #[test]
    fn reload_reproduces_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("r.txt");
        let original = ["", "a b", "\t\tc", "", "end"];

        let d = doc(&original);
        fs::write(&path, d.serialize()).unwrap();
        let loaded = Document::open(&path).unwrap();
        assert_eq!(lines(&loaded), original);
    }
}
