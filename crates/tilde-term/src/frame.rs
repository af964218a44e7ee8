// SPDX-License-Identifier: MIT
//
// FrameBuffer: the grid one frame is painted into.
//
// The editor clears it, paints text rows, status bar and message line, and
// hands it to the diff renderer. Cells live in one row-major Vec so a
// screen row is a contiguous slice the renderer can compare in one go.
//
// Text painted through `paint_text` is measured with unicode-width. A
// double-width glyph takes its cell plus a tail cell, and painting over
// either half of an existing pair blanks the other half so no stray tail
// or headless glyph is left behind.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::cell::{Cell, Style};

// ─── FrameBuffer ─────────────────────────────────────────────────────────────

/// A `width × height` grid of [`Cell`]s.
///
/// ```
/// use tilde_term::cell::{Cell, Style};
/// use tilde_term::frame::FrameBuffer;
///
/// let mut frame = FrameBuffer::new(20, 2);
/// frame.set(0, 1, Cell::new('~'));
/// let used = frame.paint_text(2, 0, "hello", Style::PLAIN);
///
/// assert_eq!(used, 5);
/// assert_eq!(frame.get(0, 1).and_then(|c| c.character()), Some('~'));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; area(width, height)],
        }
    }

    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Index into `cells`, or `None` off the grid.
    #[inline]
    fn offset(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| usize::from(y) * usize::from(self.width) + usize::from(x))
    }

    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.offset(x, y).map(|i| &self.cells[i])
    }

    /// Row `y` as a slice of `width` cells.
    #[must_use]
    pub fn row(&self, y: u16) -> Option<&[Cell]> {
        let start = self.offset(0, y)?;
        self.cells.get(start..start + usize::from(self.width))
    }

    /// Store `cell` at `(x, y)` as-is. Returns `false` off the grid.
    ///
    /// No wide-glyph bookkeeping happens here; use [`paint_text`] for text
    /// that may contain double-width characters.
    ///
    /// [`paint_text`]: Self::paint_text
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        let Some(i) = self.offset(x, y) else {
            return false;
        };
        self.cells[i] = cell;
        true
    }

    /// Overwrite all of row `y` with `cell`.
    pub fn fill_row(&mut self, y: u16, cell: Cell) {
        let Some(start) = self.offset(0, y) else {
            return;
        };
        let end = start + usize::from(self.width);
        self.cells[start..end].fill(cell);
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    /// Change dimensions. Content is discarded.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells.clear();
        self.cells.resize(area(width, height), Cell::BLANK);
    }

    // ─── Text ────────────────────────────────────────────────────────────

    /// Paint `text` on row `y` from column `x`, clipped at the right edge.
    ///
    /// Zero-width characters are dropped. A double-width character that
    /// would straddle the edge becomes a single space and ends the run.
    /// Returns the number of columns painted.
    pub fn paint_text(&mut self, x: u16, y: u16, text: &str, style: Style) -> u16 {
        if y >= self.height {
            return 0;
        }
        let mut col = x;
        for ch in text.chars() {
            if col >= self.width {
                break;
            }
            match ch.width() {
                None | Some(0) => {}
                Some(1) => {
                    self.unpair(col, y);
                    self.set(col, y, Cell::styled(ch, style));
                    col += 1;
                }
                Some(_) if col + 1 == self.width => {
                    self.unpair(col, y);
                    self.set(col, y, Cell::styled(' ', style));
                    col += 1;
                    break;
                }
                Some(_) => {
                    self.unpair(col, y);
                    self.unpair(col + 1, y);
                    self.set(col, y, Cell::styled(ch, style));
                    self.set(col + 1, y, Cell::tail(style));
                    col += 2;
                }
            }
        }
        col - x
    }

    /// Break up any double-width pair that `(x, y)` belongs to, blanking
    /// the half that is not about to be overwritten.
    fn unpair(&mut self, x: u16, y: u16) {
        let Some(i) = self.offset(x, y) else {
            return;
        };
        if self.cells[i].is_wide_tail() {
            if x > 0 {
                self.cells[i - 1] = self.cells[i - 1].blanked();
            }
        } else if x + 1 < self.width && self.cells[i + 1].is_wide_tail() {
            self.cells[i + 1] = self.cells[i + 1].blanked();
        }
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FrameBuffer({}x{})", self.width, self.height)
    }
}

const fn area(width: u16, height: u16) -> usize {
    width as usize * height as usize
}

/// Columns `s` occupies on screen.
#[must_use]
pub fn string_width(s: &str) -> usize {
    s.width()
}

// ─── Tests ───────────────────────────────────────────────────────────────────
