// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Reading raw bytes from stdin.
//
// The editor is single-threaded: a keystroke is read, decoded, applied, and
// rendered before the next one is looked at. The one place the process
// waits is here, in `poll()` on stdin with a short timeout. The timeout
// doubles as the escape-sequence timeout (a lone ESC that isn't followed by
// more bytes within one poll interval is the Escape key) and lets the loop
// notice SIGWINCH between keystrokes.
//
// `poll()` returning EINTR (a signal arrived, usually SIGWINCH) is reported
// as a timeout, not an error, so the caller gets a chance to handle the
// resize.

use std::io;
use std::time::Duration;

/// Byte chunk read from stdin.
///
/// A single keypress is 1-6 bytes; a paste can be kilobytes. 4 KB handles
/// both without waste.
const READ_BUF_SIZE: usize = 4096;

/// Reads stdin with a timeout, without a background thread.
///
/// ```no_run
/// use std::time::Duration;
/// use tilde_term::reader::StdinReader;
///
/// let mut reader = StdinReader::new();
/// if let Some(bytes) = reader.read_timeout(Duration::from_millis(100))? {
///     println!("got {} bytes", bytes.len());
/// }
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct StdinReader {
    buf: Box<[u8; READ_BUF_SIZE]>,
}

impl StdinReader {
    /// Create a reader with its own read buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Box::new([0u8; READ_BUF_SIZE]),
        }
    }

    /// Wait up to `timeout` for input and return what arrived.
    ///
    /// Returns `Ok(None)` when the timeout expires (or a signal interrupts
    /// the wait), `Ok(Some(bytes))` with a non-empty chunk otherwise.
    ///
    /// # Errors
    ///
    /// Returns `UnexpectedEof` when stdin is closed, or the OS error from
    /// `poll`/`read`.
    #[cfg(unix)]
    pub fn read_timeout(&mut self, timeout: Duration) -> io::Result<Option<&[u8]>> {
        let timeout_ms = i32::try_from(timeout.as_millis()).unwrap_or(i32::MAX);

        let ready = unsafe {
            let mut pfd = libc::pollfd {
                fd: libc::STDIN_FILENO,
                events: libc::POLLIN,
                revents: 0,
            };
            libc::poll(&raw mut pfd, 1, timeout_ms)
        };

        if ready < 0 {
            let err = io::Error::last_os_error();
            return if err.kind() == io::ErrorKind::Interrupted {
                Ok(None)
            } else {
                Err(err)
            };
        }
        if ready == 0 {
            return Ok(None);
        }

        let n = unsafe {
            libc::read(
                libc::STDIN_FILENO,
                self.buf.as_mut_ptr().cast(),
                self.buf.len(),
            )
        };

        match n {
            0 => Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed")),
            n if n < 0 => {
                let err = io::Error::last_os_error();
                match err.kind() {
                    io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock => Ok(None),
                    _ => Err(err),
                }
            }
            #[allow(clippy::cast_sign_loss)] // n > 0 here.
            n => Ok(Some(&self.buf[..n as usize])),
        }
    }

    /// Non-unix fallback: a plain blocking read, ignoring the timeout.
    ///
    /// # Errors
    ///
    /// Returns `UnexpectedEof` when stdin is closed, or the read error.
    #[cfg(not(unix))]
    pub fn read_timeout(&mut self, _timeout: Duration) -> io::Result<Option<&[u8]>> {
        use std::io::Read;

        match io::stdin().lock().read(&mut self.buf[..])? {
            0 => Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed")),
            n => Ok(Some(&self.buf[..n])),
        }
    }
}

impl Default for StdinReader {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
