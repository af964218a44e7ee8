//! One line of the document and its derived display forms.
//!
//! A [`Row`] owns three parallel views of a line:
//!
//! - `chars`: the bytes as loaded or typed, without the newline
//! - `render`: `chars` with every tab expanded to the next multiple of
//!   [`TAB_STOP`]
//! - `hl`: one [`Highlight`] per byte of `render`
//!
//! `render` and `hl` are private and only rebuilt by [`Row::update`], which
//! every mutation calls before returning, so they are never stale.
//!
//! Cursor columns live in `chars` space (`cx`); screen columns live in
//! `render` space (`rx`). [`Row::cx_to_rx`] and [`Row::rx_to_cx`] convert.

use std::fmt;

use crate::syntax::{self, Highlight, Syntax};

/// Tabs expand to the next multiple of this column.
pub const TAB_STOP: usize = 8;

/// A single line of text.
#[derive(Clone, PartialEq, Eq)]
pub struct Row {
    chars: Vec<u8>,
    render: Vec<u8>,
    hl: Vec<Highlight>,
}

impl Row {
    /// Build a row and derive its render and highlight forms.
    #[must_use]
    pub fn new(chars: Vec<u8>, syntax: Option<&Syntax>) -> Self {
        let mut row = Self {
            chars,
            render: Vec::new(),
            hl: Vec::new(),
        };
        row.update(syntax);
        row
    }

    // -- Accessors ----------------------------------------------------------

    /// The raw bytes.
    #[inline]
    #[must_use]
    pub fn chars(&self) -> &[u8] {
        &self.chars
    }

    /// The tab-expanded bytes.
    #[inline]
    #[must_use]
    pub fn render(&self) -> &[u8] {
        &self.render
    }

    /// One class per byte of [`render`](Self::render).
    #[inline]
    #[must_use]
    pub fn hl(&self) -> &[Highlight] {
        &self.hl
    }

    /// Length in raw bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Whether the row has no bytes.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    // -- Derivation ---------------------------------------------------------

    /// Rebuild `render` from `chars`, then `hl` from `render`.
    pub fn update(&mut self, syntax: Option<&Syntax>) {
        let tabs = self.chars.iter().filter(|&&c| c == b'\t').count();
        self.render.clear();
        self.render.reserve(self.chars.len() + tabs * (TAB_STOP - 1));

        for &c in &self.chars {
            if c == b'\t' {
                self.render.push(b' ');
                while self.render.len() % TAB_STOP != 0 {
                    self.render.push(b' ');
                }
            } else {
                self.render.push(c);
            }
        }

        self.rehighlight(syntax);
    }

    /// Rebuild only `hl`, after the profile changed.
    pub fn rehighlight(&mut self, syntax: Option<&Syntax>) {
        self.hl = syntax::highlight_line(&self.render, syntax);
    }

    // -- Column mapping -----------------------------------------------------

    /// Render column of raw column `cx`. Columns past the end are clamped.
    #[must_use]
    pub fn cx_to_rx(&self, cx: usize) -> usize {
        self.chars[..cx.min(self.chars.len())]
            .iter()
            .fold(0, |rx, &c| advance(rx, c))
    }

    /// Raw column of render column `rx`.
    ///
    /// Returns the first `cx` whose byte extends past `rx`, so a column in
    /// the middle of a tab's expansion maps to that tab. Columns past the
    /// end of the line map to [`len`](Self::len).
    #[must_use]
    pub fn rx_to_cx(&self, rx: usize) -> usize {
        let mut cur_rx = 0;
        for (cx, &c) in self.chars.iter().enumerate() {
            cur_rx = advance(cur_rx, c);
            if cur_rx > rx {
                return cx;
            }
        }
        self.chars.len()
    }

    // -- Editing ------------------------------------------------------------
    //
    // Each edit re-derives the row before returning.

    /// Insert `c` at `at`, or append when `at` is past the end.
    pub fn insert_byte(&mut self, at: usize, c: u8, syntax: Option<&Syntax>) {
        let at = at.min(self.chars.len());
        self.chars.insert(at, c);
        self.update(syntax);
    }

    /// Remove the byte at `at`. Returns `false` (and changes nothing) when
    /// `at` is out of range.
    pub fn delete_byte(&mut self, at: usize, syntax: Option<&Syntax>) -> bool {
        if at >= self.chars.len() {
            return false;
        }
        self.chars.remove(at);
        self.update(syntax);
        true
    }

    /// Append `bytes` to the end.
    pub fn append(&mut self, bytes: &[u8], syntax: Option<&Syntax>) {
        self.chars.extend_from_slice(bytes);
        self.update(syntax);
    }

    /// Cut the row at `at` and return the tail. `at` is clamped.
    pub fn split_off(&mut self, at: usize, syntax: Option<&Syntax>) -> Vec<u8> {
        let tail = self.chars.split_off(at.min(self.chars.len()));
        self.update(syntax);
        tail
    }
}

/// Render column after drawing `c` starting at `rx`.
const fn advance(rx: usize, c: u8) -> usize {
    if c == b'\t' {
        rx + (TAB_STOP - 1) - (rx % TAB_STOP) + 1
    } else {
        rx + 1
    }
}

impl fmt::Debug for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Row")
            .field("chars", &String::from_utf8_lossy(&self.chars))
            .field("render_len", &self.render.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
