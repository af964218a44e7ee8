//! Incremental find across rows, with wraparound.
//!
//! A [`SearchSession`] lives for one `Ctrl-F` prompt. Every key typed into
//! the prompt is forwarded to [`SearchSession::step`] together with the
//! current query:
//!
//! 1. The previous match marker is cleared.
//! 2. Enter or Escape end the step without searching.
//! 3. Arrow keys pick the direction; any other key restarts from the top.
//! 4. Rows are scanned circularly from the last match, at most once each,
//!    for the first row whose rendered text contains the query.
//!
//! The match is not written into the row's highlight classes. The session
//! keeps it as a [`MatchSpan`] and the renderer lays it over the base
//! classes, so clearing the span is all it takes to restore them.
//!
//! Cancelling the prompt puts the cursor and scroll offsets back where they
//! were at [`begin`](SearchSession::begin).

use tilde_term::input::{KeyCode, KeyEvent};

use crate::cursor::Cursor;
use crate::document::Document;
use crate::viewport::Viewport;

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

/// What a prompt key means to the search session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKey {
    /// Right or Down: next match.
    Next,
    /// Left or Up: previous match.
    Previous,
    /// Enter.
    Accept,
    /// Escape.
    Cancel,
    /// Anything else (typing, deleting): search again from the top.
    Other,
}

impl SearchKey {
    #[must_use]
    pub const fn from_key(key: &KeyEvent) -> Self {
        match key.code {
            KeyCode::Right | KeyCode::Down => Self::Next,
            KeyCode::Left | KeyCode::Up => Self::Previous,
            KeyCode::Enter => Self::Accept,
            KeyCode::Escape => Self::Cancel,
            _ => Self::Other,
        }
    }
}

// ---------------------------------------------------------------------------
// MatchSpan
// ---------------------------------------------------------------------------

/// The current match, in render columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSpan {
    pub row: usize,
    pub start: usize,
    pub len: usize,
}

impl MatchSpan {
    /// Whether render column `rx` of `row` is inside the match.
    #[inline]
    #[must_use]
    pub const fn contains(&self, row: usize, rx: usize) -> bool {
        row == self.row && rx >= self.start && rx < self.start + self.len
    }
}

// ---------------------------------------------------------------------------
// SearchSession
// ---------------------------------------------------------------------------

/// Position to return to when a search is cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Saved {
    cursor: Cursor,
    rowoff: usize,
    coloff: usize,
}

/// State of one incremental search.
#[derive(Debug, Clone, Default)]
pub struct SearchSession {
    last_match: Option<usize>,
    backward: bool,
    saved: Option<Saved>,
    overlay: Option<MatchSpan>,
}

impl SearchSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember the cursor and scroll offsets and reset the search state.
    pub fn begin(&mut self, cursor: Cursor, viewport: &Viewport) {
        *self = Self {
            saved: Some(Saved {
                cursor,
                rowoff: viewport.rowoff,
                coloff: viewport.coloff,
            }),
            ..Self::default()
        };
    }

    /// Whether a session is in progress.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.saved.is_some()
    }

    /// The match to paint, if any.
    #[must_use]
    pub const fn overlay(&self) -> Option<MatchSpan> {
        self.overlay
    }

    /// Row of the last match.
    #[must_use]
    pub const fn last_match(&self) -> Option<usize> {
        self.last_match
    }

    /// Feed one prompt key and the query as it stands after that key.
    ///
    /// On a hit the cursor moves to the match and `rowoff` is pushed past the
    /// end so the next scroll puts the match row at the top of the screen.
    /// Returns the new match, or `None` when nothing was found (cursor and
    /// viewport untouched).
    pub fn step(
        &mut self,
        query: &str,
        key: SearchKey,
        doc: &Document,
        cursor: &mut Cursor,
        viewport: &mut Viewport,
    ) -> Option<MatchSpan> {
        self.overlay = None;

        match key {
            SearchKey::Accept | SearchKey::Cancel => {
                self.reset_direction();
                return None;
            }
            SearchKey::Next => self.backward = false,
            SearchKey::Previous => self.backward = true,
            SearchKey::Other => self.reset_direction(),
        }
        if self.last_match.is_none() {
            self.backward = false;
        }

        let numrows = doc.numrows();
        if query.is_empty() || numrows == 0 {
            return None;
        }

        let needle = query.as_bytes();
        let mut current = self.last_match.map_or(numrows - 1, |r| r.min(numrows - 1));
        for _ in 0..numrows {
            current = if self.backward {
                (current + numrows - 1) % numrows
            } else {
                (current + 1) % numrows
            };

            let Some(row) = doc.row(current) else {
                continue;
            };
            if let Some(start) = find_bytes(row.render(), needle) {
                self.last_match = Some(current);
                cursor.cy = current;
                cursor.cx = row.rx_to_cx(start);
                viewport.rowoff = numrows;

                let span = MatchSpan {
                    row: current,
                    start,
                    len: needle.len(),
                };
                tracing::debug!(row = current, col = start, "search hit");
                self.overlay = Some(span);
                return Some(span);
            }
        }

        tracing::debug!(query, "search miss");
        None
    }

    /// Finish the session. Unless `accepted`, restore the cursor and scroll
    /// offsets saved by [`begin`](Self::begin).
    pub fn end(&mut self, accepted: bool, cursor: &mut Cursor, viewport: &mut Viewport) {
        if let Some(saved) = self.saved.take() {
            if !accepted {
                *cursor = saved.cursor;
                viewport.rowoff = saved.rowoff;
                viewport.coloff = saved.coloff;
            }
        }
        *self = Self::default();
    }

    const fn reset_direction(&mut self) {
        self.last_match = None;
        self.backward = false;
    }
}

/// Byte offset of the first occurrence of `needle` in `haystack`.
fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
