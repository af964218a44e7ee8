//! Which part of the document is on screen.
//!
//! Offsets are in rows (`rowoff`) and render columns (`coloff`). The text
//! area is the terminal minus two rows for the status and message bars.
//!
//! [`Viewport::scroll`] runs before every frame and moves the offsets by the
//! smallest amount that puts the cursor back on screen.

use crate::cursor::Cursor;
use crate::document::Document;

/// Rows reserved below the text area (status bar + message bar).
pub const BAR_ROWS: usize = 2;

/// Scroll offsets and text-area size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    /// First visible row.
    pub rowoff: usize,
    /// First visible render column.
    pub coloff: usize,
    /// Height of the text area.
    pub screenrows: usize,
    /// Width of the text area.
    pub screencols: usize,
}

impl Viewport {
    /// A viewport for a terminal of `rows` by `cols`.
    #[must_use]
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self {
            rowoff: 0,
            coloff: 0,
            screenrows: rows.saturating_sub(BAR_ROWS),
            screencols: cols,
        }
    }

    /// Adopt a new terminal size. Offsets are fixed up by the next
    /// [`scroll`](Self::scroll).
    pub const fn resize(&mut self, rows: usize, cols: usize) {
        self.screenrows = rows.saturating_sub(BAR_ROWS);
        self.screencols = cols;
    }

    /// Bring the cursor into view and return its render column.
    pub fn scroll(&mut self, cursor: &Cursor, doc: &Document) -> usize {
        let rx = doc.row(cursor.cy).map_or(0, |row| row.cx_to_rx(cursor.cx));

        if cursor.cy < self.rowoff {
            self.rowoff = cursor.cy;
        }
        if cursor.cy >= self.rowoff + self.screenrows {
            self.rowoff = (cursor.cy + 1).saturating_sub(self.screenrows);
        }
        if rx < self.coloff {
            self.coloff = rx;
        }
        if rx >= self.coloff + self.screencols {
            self.coloff = (rx + 1).saturating_sub(self.screencols);
        }
        rx
    }

    /// Screen position of a cursor at `(cy, rx)`, if it is inside the
    /// text area.
    #[must_use]
    pub fn screen_position(&self, cy: usize, rx: usize) -> Option<(usize, usize)> {
        let y = cy.checked_sub(self.rowoff)?;
        let x = rx.checked_sub(self.coloff)?;
        (y < self.screenrows && x < self.screencols).then_some((x, y))
    }
}
