//! Painting editor state into a [`FrameBuffer`].
//!
//! The screen is three stacked regions:
//!
//! ```text
//! ┌──────────────────────────────┐
//! │ text area (screenrows)       │  rows rowoff.., render columns coloff..
//! │ ~                            │  past the end of the document
//! ├──────────────────────────────┤
//! │ status bar (inverse)         │
//! │ message bar                  │
//! └──────────────────────────────┘
//! ```
//!
//! Painting is byte-per-column: every byte of a row's `render` becomes one
//! cell. Bytes that a terminal cannot show as-is are drawn as an inverse
//! placeholder so the columns stay aligned with `rx`.
//!
//! Each cell carries its highlight color. The diff renderer in
//! `tilde-term` sends one SGR per run of equally styled cells, so a line
//! costs a color change per highlight class rather than per byte.

use tilde_term::cell::{Cell, Style};
use tilde_term::frame::{FrameBuffer, string_width};

use crate::cursor::Cursor;
use crate::document::Document;
use crate::search::MatchSpan;
use crate::syntax::Highlight;
use crate::viewport::Viewport;

/// Shown in the welcome banner.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Longest filename prefix shown in the status bar.
const STATUS_FILENAME_MAX: usize = 20;

/// Everything one frame needs.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub doc: &'a Document,
    pub cursor: &'a Cursor,
    pub viewport: &'a Viewport,
    /// Current search match, laid over the row's highlight classes.
    pub overlay: Option<MatchSpan>,
    /// Message-bar text, already filtered for expiry.
    pub message: Option<&'a str>,
}

/// Paint the whole screen: text rows, status bar, message bar.
pub fn draw(frame: &mut FrameBuffer, scene: &Scene<'_>) {
    let text_rows = clamp_u16(scene.viewport.screenrows);
    draw_rows(frame, scene);
    draw_status_bar(frame, text_rows, scene.doc, scene.cursor);
    draw_message_bar(frame, text_rows.saturating_add(1), scene.message);
}

// ---------------------------------------------------------------------------
// Text area
// ---------------------------------------------------------------------------

/// Paint the text area.
pub fn draw_rows(frame: &mut FrameBuffer, scene: &Scene<'_>) {
    let Scene {
        doc,
        viewport,
        overlay,
        ..
    } = *scene;
    let rows = clamp_u16(viewport.screenrows).min(frame.height());
    let cols = clamp_u16(viewport.screencols).min(frame.width());

    for y in 0..rows {
        let filerow = usize::from(y) + viewport.rowoff;
        match doc.row(filerow) {
            Some(row) => {
                let render = row.render();
                let start = viewport.coloff.min(render.len());
                let end = (start + usize::from(cols)).min(render.len());

                for (x, rx) in (0..cols).zip(start..end) {
                    let class = match overlay {
                        Some(span) if span.contains(filerow, rx) => Highlight::Match,
                        _ => row.hl()[rx],
                    };
                    frame.set(x, y, text_cell(render[rx], class));
                }
            }
            None if doc.numrows() == 0 && usize::from(y) == viewport.screenrows / 3 => {
                draw_welcome(frame, y, cols);
            }
            None => {
                frame.set(0, y, Cell::new('~'));
            }
        }
    }
}

/// The cell for one rendered byte.
fn text_cell(byte: u8, class: Highlight) -> Cell {
    if is_displayable(byte) {
        Cell::styled(char::from(byte), Style::colored(class.color()))
    } else {
        Cell::styled(placeholder(byte), Style::INVERSE)
    }
}

/// Printable ASCII (space included).
const fn is_displayable(byte: u8) -> bool {
    byte == b' ' || byte.is_ascii_graphic()
}

/// Stand-in for a byte that can't be drawn: `^A` shows as `A`, `^@` as
/// `@`, everything else as `?`.
const fn placeholder(byte: u8) -> char {
    if byte <= 26 { (b'@' + byte) as char } else { '?' }
}

/// Centered banner on an empty document, with `~` in the first column.
fn draw_welcome(frame: &mut FrameBuffer, y: u16, cols: u16) {
    let banner = format!("Tilde editor -- version {VERSION}");
    let len = banner.len().min(usize::from(cols));
    let mut padding = (usize::from(cols) - len) / 2;
    let mut x: u16 = 0;
    if padding > 0 {
        frame.set(x, y, Cell::new('~'));
        x += 1;
        padding -= 1;
    }
    x = x.saturating_add(clamp_u16(padding));
    frame.paint_text(x, y, &banner[..len], Style::PLAIN);
}

// ---------------------------------------------------------------------------
// Bars
// ---------------------------------------------------------------------------

/// Left and right halves of the status bar.
#[must_use]
pub fn status_text(doc: &Document, cursor: &Cursor) -> (String, String) {
    let name = doc.filename().map_or_else(
        || "[No Name]".to_string(),
        |p| p.to_string_lossy().chars().take(STATUS_FILENAME_MAX).collect(),
    );
    let modified = if doc.is_dirty() { "(modified)" } else { "" };
    let left = format!("{name} - {} lines {modified}", doc.numrows());
    let right = format!("{} | {}/{}", doc.filetype(), cursor.cy + 1, doc.numrows());
    (left, right)
}

/// Paint the inverse status bar on row `y`. The right half is drawn only
/// if it fits after the left half.
pub fn draw_status_bar(frame: &mut FrameBuffer, y: u16, doc: &Document, cursor: &Cursor) {
    let width = frame.width();
    frame.fill_row(y, Cell::styled(' ', Style::INVERSE));

    let (left, right) = status_text(doc, cursor);
    let used = frame.paint_text(0, y, &left, Style::INVERSE);

    let rlen = clamp_u16(string_width(&right));
    if used.saturating_add(rlen) <= width {
        frame.paint_text(width - rlen, y, &right, Style::INVERSE);
    }
}

/// Paint the message bar on row `y`, truncated to the frame width.
pub fn draw_message_bar(frame: &mut FrameBuffer, y: u16, message: Option<&str>) {
    frame.fill_row(y, Cell::BLANK);
    if let Some(text) = message {
        frame.paint_text(0, y, text, Style::PLAIN);
    }
}

#[allow(clippy::cast_possible_truncation)]
const fn clamp_u16(n: usize) -> u16 {
    if n > u16::MAX as usize { u16::MAX } else { n as u16 }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
