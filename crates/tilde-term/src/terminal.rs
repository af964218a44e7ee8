// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Terminal setup and teardown.
//
// `Terminal::enter` switches stdin to raw mode, moves to the alternate
// screen and measures the window; `leave` (or dropping the handle) undoes
// all of it. termios, TIOCGWINSZ and isatty have no safe std wrappers, so
// the libc calls live here behind small functions.
//
// A panic can fire while stdout's lock is held mid-frame. The panic hook
// therefore writes its restore bytes straight to fd 1 and puts back the
// termios saved in a static, then defers to the previous hook so the
// message lands on a sane terminal.
//
// TIOCGWINSZ reports 0×0 on some serial consoles. There the window is
// measured by parking the cursor in the bottom-right corner and asking
// where it ended up.

use std::io::{self, Write};
use std::sync::{Mutex, Once};
use std::time::{Duration, Instant};

use crate::ansi;
use crate::reader::StdinReader;

// ─── Size ────────────────────────────────────────────────────────────────────

/// Window dimensions in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub cols: u16,
    pub rows: u16,
}

/// Used until a real measurement succeeds, and when stdin is not a tty.
const DEFAULT_SIZE: Size = Size { cols: 80, rows: 24 };

const CURSOR_REPORT_WAIT: Duration = Duration::from_millis(500);

/// Window size from `TIOCGWINSZ`, or `None` if unavailable or zero.
#[cfg(unix)]
#[must_use]
pub fn query_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let rc = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &raw mut ws) };
    (rc == 0 && ws.ws_col != 0 && ws.ws_row != 0).then_some(Size {
        cols: ws.ws_col,
        rows: ws.ws_row,
    })
}

#[cfg(not(unix))]
#[must_use]
pub fn query_size() -> Option<Size> {
    None
}

#[cfg(unix)]
#[must_use]
pub fn stdin_is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) == 1 }
}

#[cfg(not(unix))]
#[must_use]
pub fn stdin_is_tty() -> bool {
    false
}

/// Read `ESC [ rows ; cols R` out of `reply`, ignoring anything before it.
#[must_use]
pub fn parse_cursor_report(reply: &[u8]) -> Option<Size> {
    let csi = reply.windows(2).position(|pair| pair == b"\x1b[")?;
    let rest = &reply[csi + 2..];
    let body = std::str::from_utf8(&rest[..rest.iter().position(|&b| b == b'R')?]).ok()?;
    let (rows, cols) = body.split_once(';')?;
    let rows: u16 = rows.parse().ok()?;
    let cols: u16 = cols.parse().ok()?;
    (rows != 0 && cols != 0).then_some(Size { cols, rows })
}

/// Measure the window through a cursor position report. Needs raw mode.
fn measure_by_cursor() -> io::Result<Size> {
    {
        let mut out = io::stdout().lock();
        ansi::cursor_to_bottom_right(&mut out)?;
        ansi::request_cursor_position(&mut out)?;
        out.flush()?;
    }

    let give_up = Instant::now() + CURSOR_REPORT_WAIT;
    let mut reader = StdinReader::new();
    let mut reply = Vec::new();
    while !reply.contains(&b'R') {
        let left = give_up.saturating_duration_since(Instant::now());
        if left.is_zero() {
            break;
        }
        if let Some(chunk) = reader.read_timeout(left)? {
            reply.extend_from_slice(chunk);
        }
    }
    parse_cursor_report(&reply).ok_or_else(|| io::Error::other("unable to determine window size"))
}

// ─── Raw mode ────────────────────────────────────────────────────────────────

/// termios as it was before raw mode, for the panic hook.
#[cfg(unix)]
static SAVED_TERMIOS: Mutex<Option<libc::termios>> = Mutex::new(None);

/// Stdin switched to raw mode. Holds the settings to go back to.
#[cfg(unix)]
struct RawMode {
    cooked: libc::termios,
}

#[cfg(unix)]
impl RawMode {
    /// Switch stdin to raw mode. `Ok(None)` when stdin is not a terminal.
    fn enable() -> io::Result<Option<Self>> {
        if !stdin_is_tty() {
            return Ok(None);
        }
        let mut cooked: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(libc::STDIN_FILENO, &raw mut cooked) } != 0 {
            return Err(io::Error::last_os_error());
        }

        let mut raw = cooked;
        // Input: keep Ctrl-S/Ctrl-Q and CR as keys, no break signal, 8-bit clean.
        raw.c_iflag &= !(libc::BRKINT | libc::ICRNL | libc::INPCK | libc::ISTRIP | libc::IXON);
        raw.c_oflag &= !libc::OPOST;
        raw.c_cflag |= libc::CS8;
        // Local: no echo, no line editing, no Ctrl-C/Ctrl-Z/Ctrl-V handling.
        raw.c_lflag &= !(libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG);
        // poll() decides when to read; a read then returns at least one byte.
        raw.c_cc[libc::VMIN] = 1;
        raw.c_cc[libc::VTIME] = 0;
        apply(&raw)?;

        if let Ok(mut saved) = SAVED_TERMIOS.lock() {
            *saved = Some(cooked);
        }
        Ok(Some(Self { cooked }))
    }

    fn restore(self) -> io::Result<()> {
        apply(&self.cooked)?;
        if let Ok(mut saved) = SAVED_TERMIOS.lock() {
            *saved = None;
        }
        Ok(())
    }
}

#[cfg(unix)]
fn apply(termios: &libc::termios) -> io::Result<()> {
    if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, termios) } == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
struct RawMode;

#[cfg(not(unix))]
impl RawMode {
    fn enable() -> io::Result<Option<Self>> {
        Ok(None)
    }

    fn restore(self) -> io::Result<()> {
        Ok(())
    }
}

// ─── Panic hook ──────────────────────────────────────────────────────────────

/// Leave sync mode, drop colors, show the cursor, and exit the alternate
/// screen last so the shell's screen comes back clean.
const PANIC_RESTORE: &[u8] = b"\x1b[?2026l\x1b[m\x1b[?25h\x1b[?1049l";

static HOOK: Once = Once::new();

fn install_panic_hook() {
    HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore_after_panic();
            previous(info);
        }));
    });
}

#[cfg(unix)]
fn restore_after_panic() {
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            PANIC_RESTORE.as_ptr().cast(),
            PANIC_RESTORE.len(),
        );
    }
    // try_lock: the panic may have happened while this thread held it.
    if let Ok(saved) = SAVED_TERMIOS.try_lock() {
        if let Some(cooked) = saved.as_ref() {
            let _ = apply(cooked);
        }
    }
}

#[cfg(not(unix))]
fn restore_after_panic() {
    let mut out = io::stdout();
    let _ = out.write_all(PANIC_RESTORE);
    let _ = out.flush();
}

// ─── Terminal ────────────────────────────────────────────────────────────────

/// The controlling terminal. Restored on drop if still entered.
///
/// ```no_run
/// use tilde_term::terminal::Terminal;
///
/// let mut term = Terminal::new()?;
/// term.enter()?;
/// let size = term.size();
/// term.leave()?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct Terminal {
    raw: Option<RawMode>,
    size: Size,
    entered: bool,
}

impl Terminal {
    /// A handle in normal (cooked) mode, sized from `TIOCGWINSZ` or 80×24.
    ///
    /// # Errors
    ///
    /// Never fails on unix; the signature leaves room for platforms that can.
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            raw: None,
            size: query_size().unwrap_or(DEFAULT_SIZE),
            entered: false,
        })
    }

    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Ask the OS for the window size again, keeping the old one on failure.
    pub fn refresh_size(&mut self) -> Size {
        self.size = query_size().unwrap_or(self.size);
        self.size
    }

    #[must_use]
    pub const fn is_entered(&self) -> bool {
        self.entered
    }

    /// Raw mode, alternate screen, hidden cursor, measured window.
    /// Does nothing if already entered.
    ///
    /// # Errors
    ///
    /// Fails if termios or stdout fail, or if stdin is a terminal whose
    /// size can be found neither by `TIOCGWINSZ` nor by a cursor report.
    pub fn enter(&mut self) -> io::Result<()> {
        if self.entered {
            return Ok(());
        }
        install_panic_hook();
        self.raw = RawMode::enable()?;
        self.entered = true;

        if stdin_is_tty() {
            self.size = match query_size() {
                Some(size) => size,
                None => measure_by_cursor()?,
            };
        }
        tracing::debug!(cols = self.size.cols, rows = self.size.rows, "terminal entered");

        let mut out = io::stdout().lock();
        ansi::enter_alt_screen(&mut out)?;
        ansi::cursor_hide(&mut out)?;
        ansi::clear_screen(&mut out)?;
        ansi::cursor_home(&mut out)?;
        out.flush()
    }

    /// Undo [`enter`](Self::enter). Does nothing if not entered.
    ///
    /// # Errors
    ///
    /// Fails if writing to stdout or restoring termios fails.
    pub fn leave(&mut self) -> io::Result<()> {
        if !self.entered {
            return Ok(());
        }
        {
            let mut out = io::stdout().lock();
            ansi::end_sync(&mut out)?;
            ansi::reset(&mut out)?;
            ansi::clear_screen(&mut out)?;
            ansi::cursor_home(&mut out)?;
            ansi::cursor_show(&mut out)?;
            ansi::exit_alt_screen(&mut out)?;
            out.flush()?;
        }
        if let Some(raw) = self.raw.take() {
            raw.restore()?;
        }
        self.entered = false;
        tracing::debug!("terminal restored");
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
