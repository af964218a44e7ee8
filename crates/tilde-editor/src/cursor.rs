//! The cursor: a raw-column position and its movement rules.
//!
//! `cx` is a byte offset into the row's `chars`, `cy` a row index. The cursor
//! may sit one past the last row (`cy == numrows`), the virtual row where
//! typing appends a new line. It never sits past the end of its row.
//!
//! The cursor does not own or reference the document; movement methods take
//! it as a parameter.

use crate::document::Document;

/// Direction of a single-step move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// A position in a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    /// Column in raw bytes.
    pub cx: usize,
    /// Row index, `0..=numrows`.
    pub cy: usize,
}

impl Cursor {
    #[must_use]
    pub const fn new(cy: usize, cx: usize) -> Self {
        Self { cx, cy }
    }

    // -- Single steps -------------------------------------------------------

    /// Move one step, wrapping across line ends horizontally, then clamp
    /// `cx` to the new row.
    pub fn step(&mut self, dir: Direction, doc: &Document) {
        match dir {
            Direction::Left => {
                if self.cx > 0 {
                    self.cx -= 1;
                } else if self.cy > 0 {
                    self.cy -= 1;
                    self.cx = doc.row_len(self.cy);
                }
            }
            Direction::Right => {
                if let Some(row) = doc.row(self.cy) {
                    if self.cx < row.len() {
                        self.cx += 1;
                    } else {
                        self.cy += 1;
                        self.cx = 0;
                    }
                }
            }
            Direction::Up => self.cy = self.cy.saturating_sub(1),
            Direction::Down => {
                if self.cy < doc.numrows() {
                    self.cy += 1;
                }
            }
        }
        self.clamp(doc);
    }

    // -- Line positions -----------------------------------------------------

    /// Start of the row.
    pub const fn home(&mut self) {
        self.cx = 0;
    }

    /// End of the row. No-op on the virtual row.
    pub fn end(&mut self, doc: &Document) {
        if let Some(row) = doc.row(self.cy) {
            self.cx = row.len();
        }
    }

    // -- Pages --------------------------------------------------------------

    /// Jump to the top of the screen, then move up a full screen.
    pub fn page_up(&mut self, doc: &Document, rowoff: usize, screenrows: usize) {
        self.cy = rowoff;
        for _ in 0..screenrows {
            self.step(Direction::Up, doc);
        }
    }

    /// Jump to the bottom of the screen, then move down a full screen.
    pub fn page_down(&mut self, doc: &Document, rowoff: usize, screenrows: usize) {
        self.cy = (rowoff + screenrows.saturating_sub(1)).min(doc.numrows());
        for _ in 0..screenrows {
            self.step(Direction::Down, doc);
        }
    }

    // -- Invariants ---------------------------------------------------------

    /// Pull the cursor back inside the document: `cy <= numrows` and
    /// `cx <= len(row)` (0 on the virtual row).
    pub fn clamp(&mut self, doc: &Document) {
        self.cy = self.cy.min(doc.numrows());
        self.cx = self.cx.min(doc.row_len(self.cy));
    }
}
