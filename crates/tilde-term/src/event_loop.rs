// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// The main loop.
//
// Single-threaded: block in poll() on stdin for at most the configured
// timeout, decode whatever bytes arrived into keys, give them to the App,
// and repaint if anything happened. A repaint clears a FrameBuffer, lets
// the App fill it, and sends the diff plus the cursor position in one
// write.
//
// A poll that times out is not wasted. It turns a lone ESC into the Escape
// key, gives the App a tick (status messages expire there), and is where
// a window resize gets noticed. The SIGWINCH handler only raises a flag;
// the loop clears it, re-measures, resizes the frame and forces a full
// repaint.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::ansi;
use crate::diff::DiffRenderer;
use crate::frame::FrameBuffer;
use crate::input::{Decoder, KeyEvent};
use crate::reader::StdinReader;
use crate::terminal::{Size, Terminal};

// ─── Resize signal ───────────────────────────────────────────────────────────

static RESIZED: AtomicBool = AtomicBool::new(false);

#[cfg(unix)]
extern "C" fn on_sigwinch(_signal: libc::c_int) {
    RESIZED.store(true, Ordering::Relaxed);
}

/// Route SIGWINCH to [`on_sigwinch`]. Without `SA_RESTART` so a blocked
/// poll() returns early and the resize is handled at once.
#[cfg(unix)]
fn watch_resizes() {
    unsafe {
        let mut action: libc::sigaction = std::mem::zeroed();
        action.sa_sigaction = on_sigwinch as *const () as usize;
        libc::sigemptyset(&raw mut action.sa_mask);
        libc::sigaction(libc::SIGWINCH, &raw const action, std::ptr::null_mut());
    }
}

#[cfg(not(unix))]
fn watch_resizes() {}

// ─── App ─────────────────────────────────────────────────────────────────────

/// Returned from [`App::on_key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// The program driven by an [`EventLoop`].
///
/// Only [`paint`](App::paint) is required. After any key, tick that asks
/// for it, or resize, the loop calls `paint` and then `cursor`.
pub trait App {
    fn on_key(&mut self, _key: KeyEvent) -> Action {
        Action::Continue
    }

    /// The window is now `size`. The frame has already been resized.
    fn on_resize(&mut self, _size: Size) {}

    /// A poll interval passed with no input. `true` requests a repaint.
    fn on_tick(&mut self) -> bool {
        false
    }

    /// Fill `frame`, which arrives blank.
    fn paint(&mut self, frame: &mut FrameBuffer);

    /// Screen position for the hardware cursor, `None` to hide it.
    fn cursor(&self) -> Option<(u16, u16)> {
        None
    }
}

// ─── LoopConfig ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopConfig {
    /// Longest single wait for input, in milliseconds. Also how long a
    /// lone ESC waits for the rest of an escape sequence.
    pub poll_timeout_ms: u64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            poll_timeout_ms: 100,
        }
    }
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

/// Owns the terminal, the key decoder and the renderer.
///
/// ```no_run
/// use tilde_term::event_loop::{Action, App, EventLoop};
/// use tilde_term::frame::FrameBuffer;
/// use tilde_term::input::KeyEvent;
///
/// struct Blank;
///
/// impl App for Blank {
///     fn on_key(&mut self, key: KeyEvent) -> Action {
///         if key.is_ctrl('q') { Action::Quit } else { Action::Continue }
///     }
///
///     fn paint(&mut self, _frame: &mut FrameBuffer) {}
/// }
///
/// EventLoop::new()?.run(&mut Blank)?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct EventLoop {
    terminal: Terminal,
    decoder: Decoder,
    renderer: DiffRenderer,
    config: LoopConfig,
}

impl EventLoop {
    /// # Errors
    ///
    /// Returns an error if the terminal handle cannot be created.
    pub fn new() -> io::Result<Self> {
        Self::with_config(LoopConfig::default())
    }

    /// # Errors
    ///
    /// Returns an error if the terminal handle cannot be created.
    pub fn with_config(config: LoopConfig) -> io::Result<Self> {
        Ok(Self {
            terminal: Terminal::new()?,
            decoder: Decoder::new(),
            renderer: DiffRenderer::new(),
            config,
        })
    }

    /// Take over the terminal before [`run`](Self::run), so that
    /// [`size`](Self::size) reports the measured window.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode fails or the window cannot be measured.
    pub fn enter(&mut self) -> io::Result<()> {
        self.terminal.enter()
    }

    /// Give the terminal back without running, for startup failures after
    /// [`enter`](Self::enter).
    ///
    /// # Errors
    ///
    /// Returns an error if stdout or termios cannot be restored.
    pub fn leave(&mut self) -> io::Result<()> {
        self.terminal.leave()
    }

    #[must_use]
    pub const fn size(&self) -> Size {
        self.terminal.size()
    }

    /// Loop until the App quits or stdin reaches end of file. The terminal
    /// is entered if needed and is always restored on the way out.
    ///
    /// # Errors
    ///
    /// Returns the first terminal, read or write error.
    pub fn run(&mut self, app: &mut impl App) -> io::Result<()> {
        self.terminal.enter()?;
        watch_resizes();
        let outcome = self.pump(app);
        let restored = self.terminal.leave();
        outcome.and(restored)
    }

    fn pump(&mut self, app: &mut impl App) -> io::Result<()> {
        let size = self.terminal.size();
        let mut frame = FrameBuffer::new(size.cols, size.rows);
        let mut reader = StdinReader::new();
        let wait = Duration::from_millis(self.config.poll_timeout_ms);
        let mut repaint = true;

        loop {
            if repaint {
                draw(&mut self.renderer, &mut frame, app, &mut io::stdout().lock())?;
                repaint = false;
            }

            let keys = match reader.read_timeout(wait) {
                Ok(Some(bytes)) => self.decoder.advance(bytes),
                Ok(None) => {
                    repaint |= app.on_tick();
                    self.decoder.flush()
                }
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    tracing::info!("stdin closed");
                    return Ok(());
                }
                Err(e) => return Err(e),
            };

            for key in keys {
                repaint = true;
                if app.on_key(key) == Action::Quit {
                    return Ok(());
                }
            }

            if RESIZED.swap(false, Ordering::Relaxed) {
                let size = self.terminal.refresh_size();
                tracing::debug!(cols = size.cols, rows = size.rows, "resize");
                frame.resize(size.cols, size.rows);
                self.renderer.force_redraw();
                app.on_resize(size);
                repaint = true;
            }
        }
    }
}

/// Paint one frame, diff it, append the cursor, and write it all at once.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn draw(
    renderer: &mut DiffRenderer,
    frame: &mut FrameBuffer,
    app: &mut impl App,
    out: &mut impl Write,
) -> io::Result<()> {
    frame.clear();
    app.paint(frame);
    let stats = renderer.render(frame);
    tracing::trace!(
        rendered = stats.cells_rendered,
        skipped = stats.cells_skipped,
        bytes = stats.bytes_written,
        "frame"
    );

    let tail = renderer.trailer();
    if let Some((x, y)) = app.cursor() {
        ansi::cursor_to(tail, x, y)?;
        ansi::cursor_show(tail)?;
    } else {
        ansi::cursor_hide(tail)?;
    }
    renderer.flush_to(out)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
