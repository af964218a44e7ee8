// SPDX-License-Identifier: MIT
//
// Differential renderer.
//
// Keeps the last frame it drew and, given a new one, produces only the
// bytes needed to turn the old screen into the new one. Rows that compare
// equal are skipped whole; inside a changed row only the differing cells
// are sent. A Pen follows the terminal's cursor and rendition as bytes are
// queued, so a run of adjacent cells in one style costs a single cursor
// move and a single SGR.
//
// Everything for a frame, including whatever the caller appends through
// `trailer`, is collected in one Vec and written with one write() inside
// a DEC 2026 synchronized-update bracket.

use std::io::{self, Write};

use unicode_width::UnicodeWidthChar;

use crate::ansi;
use crate::cell::{Cell, Style};
use crate::frame::FrameBuffer;

const OUTPUT_CAPACITY: usize = 16 * 1024;

// ─── RenderStats ─────────────────────────────────────────────────────────────

/// What one [`DiffRenderer::render`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    pub cells_rendered: usize,
    pub cells_skipped: usize,
    pub bytes_written: usize,
}

// ─── Pen ─────────────────────────────────────────────────────────────────────

/// Where the terminal cursor is and which rendition is active, as far as
/// the bytes queued so far are concerned.
#[derive(Default)]
struct Pen {
    at: Option<(u16, u16)>,
    style: Option<Style>,
}

impl Pen {
    fn draw(&mut self, out: &mut Vec<u8>, x: u16, y: u16, cell: Cell) -> io::Result<()> {
        let glyph = match cell.character() {
            Some(ch) => ch,
            // Right half of a glyph drawn just before: the terminal already
            // advanced past it.
            None if self.at == Some((x.saturating_add(1), y)) => return Ok(()),
            None => ' ',
        };
        if self.at != Some((x, y)) {
            ansi::cursor_to(out, x, y)?;
        }
        if self.style != Some(cell.style) {
            ansi::style(out, cell.style)?;
            self.style = Some(cell.style);
        }
        let mut utf8 = [0; 4];
        out.extend_from_slice(glyph.encode_utf8(&mut utf8).as_bytes());
        let advance = u16::try_from(glyph.width().unwrap_or(0)).unwrap_or(1);
        self.at = Some((x.saturating_add(advance), y));
        Ok(())
    }
}

// ─── DiffRenderer ────────────────────────────────────────────────────────────

/// Turns successive frames into minimal terminal output.
///
/// ```
/// use tilde_term::cell::Cell;
/// use tilde_term::diff::DiffRenderer;
/// use tilde_term::frame::FrameBuffer;
///
/// let mut renderer = DiffRenderer::new();
/// let mut frame = FrameBuffer::new(10, 2);
/// assert_eq!(renderer.render(&frame).cells_rendered, 20);
///
/// frame.set(0, 1, Cell::new('~'));
/// assert_eq!(renderer.render(&frame).cells_rendered, 1);
///
/// let mut screen = Vec::new();
/// renderer.flush_to(&mut screen).unwrap();
/// ```
pub struct DiffRenderer {
    out: Vec<u8>,
    previous: Option<FrameBuffer>,
}

impl DiffRenderer {
    /// A renderer whose first frame repaints the whole screen.
    #[must_use]
    pub fn new() -> Self {
        Self {
            out: Vec::with_capacity(OUTPUT_CAPACITY),
            previous: None,
        }
    }

    /// Queue the bytes that bring the screen from the last frame to
    /// `current`, replacing anything queued before.
    ///
    /// With no previous frame, or one of another size, the screen is
    /// cleared and every cell is sent.
    pub fn render(&mut self, current: &FrameBuffer) -> RenderStats {
        self.out.clear();
        let mut stats = RenderStats::default();

        if current.width() > 0 && current.height() > 0 {
            // Writes into a Vec cannot fail.
            let _ = self.queue_frame(current, &mut stats);
        }
        stats.bytes_written = self.out.len();
        self.previous = Some(current.clone());
        stats
    }

    fn queue_frame(&mut self, current: &FrameBuffer, stats: &mut RenderStats) -> io::Result<()> {
        let out = &mut self.out;
        let previous = self.previous.as_ref().filter(|prev| {
            prev.width() == current.width() && prev.height() == current.height()
        });

        ansi::begin_sync(out)?;
        if previous.is_none() {
            ansi::clear_screen(out)?;
            ansi::cursor_home(out)?;
        }

        let mut pen = Pen::default();
        let mut dirty = Vec::with_capacity(usize::from(current.width()));
        for y in 0..current.height() {
            let Some(row) = current.row(y) else {
                continue;
            };
            let old = previous.and_then(|p| p.row(y));
            if old == Some(row) {
                stats.cells_skipped += row.len();
                continue;
            }

            dirty.clear();
            dirty.extend(
                row.iter()
                    .enumerate()
                    .map(|(i, cell)| old.is_none_or(|o| o[i] != *cell)),
            );
            // A glyph and its tail go out together or not at all.
            for i in 1..row.len() {
                if row[i].is_wide_tail() && dirty[i] != dirty[i - 1] {
                    dirty[i] = true;
                    dirty[i - 1] = true;
                }
            }

            for (x, (cell, &changed)) in (0..).zip(row.iter().zip(&dirty)) {
                if changed {
                    pen.draw(out, x, y, *cell)?;
                    stats.cells_rendered += 1;
                } else {
                    stats.cells_skipped += 1;
                }
            }
        }

        ansi::reset(out)?;
        ansi::end_sync(out)
    }

    /// Bytes queued by the last render plus any trailer.
    #[must_use]
    pub fn output_bytes(&self) -> &[u8] {
        &self.out
    }

    /// Append to the queued output, after the frame. Used for the cursor.
    pub fn trailer(&mut self) -> &mut Vec<u8> {
        &mut self.out
    }

    /// Write everything queued to `w` in one call and empty the queue.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to or flushing `w` fails.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        if !self.out.is_empty() {
            w.write_all(&self.out)?;
            w.flush()?;
            self.out.clear();
        }
        Ok(())
    }

    /// Forget the last frame; the next render repaints everything.
    pub fn force_redraw(&mut self) {
        self.previous = None;
    }
}

impl Default for DiffRenderer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
