// SPDX-License-Identifier: MIT
//
// Terminal input decoder.
//
// Turns raw stdin bytes into key events. A terminal in raw mode sends:
//
// - Printable ASCII and UTF-8 multi-byte characters as-is
// - Control keys as bytes 0x00-0x1F (Ctrl-Q = 0x11, Enter = 0x0D, ...)
// - Navigation keys as CSI sequences: ESC [ A..D / H / F, ESC [ n ~
// - The same navigation keys as SS3 sequences on some terminals: ESC O x
//
// Anything else after an ESC (function keys, Alt+key, unknown CSI finals)
// is consumed whole and reported as the Escape key, so a stray sequence
// never turns into inserted text.
//
// # Escape ambiguity
//
// A lone ESC byte is either the Escape key or the start of a sequence whose
// remaining bytes have not arrived yet. The decoder keeps it pending; the
// caller calls [`Decoder::flush`] once a read times out with nothing new,
// which turns the pending ESC into an Escape keypress.

use bitflags::bitflags;

// ─── Key Types ──────────────────────────────────────────────────────────────

/// A decoded keypress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Which key was pressed.
    pub code: KeyCode,
    /// Active modifier keys.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// A key with no modifiers.
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
        }
    }

    /// Ctrl + a letter, as the terminal reports it (`ctrl('q')` is 0x11).
    #[must_use]
    pub const fn ctrl(ch: char) -> Self {
        Self {
            code: KeyCode::Char(ch),
            modifiers: Modifiers::CTRL,
        }
    }

    /// Whether this is Ctrl + `ch`.
    #[must_use]
    pub fn is_ctrl(&self, ch: char) -> bool {
        self.modifiers.contains(Modifiers::CTRL) && self.code == KeyCode::Char(ch)
    }
}

/// Identity of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// A character (printable, or the letter of a Ctrl combination).
    Char(char),
    Enter,
    Tab,
    Backspace,
    Escape,
    Delete,
    // ── Navigation ──────────────────────────────────────────────
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}

bitflags! {
    /// Keyboard modifier flags, in xterm's CSI encoding (`param = 1 + bits`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const CTRL  = 0b0000_0100;
    }
}

// ─── Decoder ────────────────────────────────────────────────────────────────

/// Incremental key decoder.
///
/// Feed raw bytes via [`advance`](Decoder::advance); incomplete sequences
/// stay buffered until the next call.
///
/// ```
/// use tilde_term::input::{Decoder, KeyCode, KeyEvent};
///
/// let mut decoder = Decoder::new();
/// assert_eq!(decoder.advance(b"\x1b[A"), vec![KeyEvent::plain(KeyCode::Up)]);
/// assert!(decoder.advance(b"\x1b").is_empty());
/// assert_eq!(decoder.flush(), vec![KeyEvent::plain(KeyCode::Escape)]);
/// ```
pub struct Decoder {
    /// Bytes waiting for the rest of their sequence.
    buf: Vec<u8>,
}

impl Decoder {
    /// Create a decoder with an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(16),
        }
    }

    /// Feed raw bytes and return every key that can be decoded.
    pub fn advance(&mut self, data: &[u8]) -> Vec<KeyEvent> {
        self.buf.extend_from_slice(data);
        let mut keys = Vec::new();
        let mut pos = 0;

        while pos < self.buf.len() {
            match decode_one(&self.buf[pos..]) {
                Decoded::Key(key, consumed) => {
                    keys.push(key);
                    pos += consumed;
                }
                Decoded::Incomplete => break,
                Decoded::Skip(n) => pos += n,
            }
        }

        if pos > 0 {
            self.buf.drain(..pos);
        }
        keys
    }

    /// Are there buffered bytes that might complete with more data?
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.buf.is_empty()
    }

    /// Resolve pending bytes after a read timeout.
    ///
    /// A lone ESC becomes the Escape key. The rest of a truncated sequence
    /// (`ESC [`, `ESC O`, a partial UTF-8 character) is dropped.
    pub fn flush(&mut self) -> Vec<KeyEvent> {
        let keys = if self.buf.first() == Some(&0x1B) {
            vec![KeyEvent::plain(KeyCode::Escape)]
        } else {
            Vec::new()
        };
        self.buf.clear();
        keys
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Stateless Decoding ─────────────────────────────────────────────────────

/// Result of decoding one key from the front of a byte slice.
enum Decoded {
    /// A key, consuming `usize` bytes.
    Key(KeyEvent, usize),
    /// Sequence is incomplete, need more bytes.
    Incomplete,
    /// Unrecognized input, drop `usize` bytes.
    Skip(usize),
}

fn decode_one(buf: &[u8]) -> Decoded {
    let Some(&lead) = buf.first() else {
        return Decoded::Skip(0);
    };

    match lead {
        0x1B => decode_escape(buf),
        0x08 | 0x7F => Decoded::Key(KeyEvent::plain(KeyCode::Backspace), 1),
        0x09 => Decoded::Key(KeyEvent::plain(KeyCode::Tab), 1),
        0x0A | 0x0D => Decoded::Key(KeyEvent::plain(KeyCode::Enter), 1),
        0x00 => Decoded::Key(KeyEvent::ctrl('@'), 1),
        b @ 0x01..=0x1A => Decoded::Key(KeyEvent::ctrl(char::from(b + b'a' - 1)), 1),
        // Ctrl-\ Ctrl-] Ctrl-^ Ctrl-_
        b @ 0x1C..=0x1F => Decoded::Key(KeyEvent::ctrl(char::from(b + b'@')), 1),
        b @ 0x20..=0x7E => Decoded::Key(KeyEvent::plain(KeyCode::Char(char::from(b))), 1),
        0xC0..=0xFF => decode_utf8(buf),
        _ => Decoded::Skip(1),
    }
}

fn decode_escape(buf: &[u8]) -> Decoded {
    let Some(&next) = buf.get(1) else {
        return Decoded::Incomplete;
    };

    match next {
        b'[' => decode_csi(buf),
        b'O' => decode_ss3(buf),
        0x20..=0x7E => Decoded::Key(KeyEvent::plain(KeyCode::Escape), 2),
        // ESC ESC, or ESC before a control byte: the first one is a real
        // Escape and the second byte starts a new key.
        _ => Decoded::Key(KeyEvent::plain(KeyCode::Escape), 1),
    }
}

/// `ESC [ params final`, where params are `0x30..=0x3F` and final is
/// `0x40..=0x7E`.
fn decode_csi(buf: &[u8]) -> Decoded {
    let mut end = 2;
    loop {
        let Some(&b) = buf.get(end) else {
            return Decoded::Incomplete;
        };
        if (0x40..=0x7E).contains(&b) {
            break;
        }
        if !(0x20..=0x3F).contains(&b) {
            return Decoded::Skip(end);
        }
        end += 1;
    }

    let final_byte = buf[end];
    let params = &buf[2..end];
    let consumed = end + 1;

    let (first, modifier_param) = split_params(params);
    let modifiers = decode_modifiers(modifier_param);

    let code = if final_byte == b'~' {
        match first {
            1 | 7 => KeyCode::Home,
            3 => KeyCode::Delete,
            4 | 8 => KeyCode::End,
            5 => KeyCode::PageUp,
            6 => KeyCode::PageDown,
            _ => KeyCode::Escape,
        }
    } else {
        match final_byte {
            b'A' => KeyCode::Up,
            b'B' => KeyCode::Down,
            b'C' => KeyCode::Right,
            b'D' => KeyCode::Left,
            b'H' => KeyCode::Home,
            b'F' => KeyCode::End,
            _ => KeyCode::Escape,
        }
    };

    Decoded::Key(KeyEvent { code, modifiers }, consumed)
}

fn decode_ss3(buf: &[u8]) -> Decoded {
    let Some(&b) = buf.get(2) else {
        return Decoded::Incomplete;
    };

    let code = match b {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        _ => KeyCode::Escape,
    };
    Decoded::Key(KeyEvent::plain(code), 3)
}

fn decode_utf8(buf: &[u8]) -> Decoded {
    let expected = utf8_char_len(buf[0]);
    if expected == 0 {
        return Decoded::Skip(1);
    }
    if buf.len() < expected {
        return Decoded::Incomplete;
    }

    std::str::from_utf8(&buf[..expected])
        .ok()
        .and_then(|s| s.chars().next())
        .map_or(Decoded::Skip(1), |ch| {
            Decoded::Key(KeyEvent::plain(KeyCode::Char(ch)), expected)
        })
}

// ─── Helpers ────────────────────────────────────────────────────────────────

/// Split `n;m` CSI parameters into `(n, m)`. Missing values are 0.
fn split_params(raw: &[u8]) -> (u16, u16) {
    let mut parts = raw.split(|&b| b == b';').map(parse_u16);
    let first = parts.next().unwrap_or(0);
    let second = parts.next().unwrap_or(0);
    (first, second)
}

fn parse_u16(digits: &[u8]) -> u16 {
    digits
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .fold(0u16, |acc, &b| {
            acc.saturating_mul(10).saturating_add(u16::from(b - b'0'))
        })
}

/// Decode the xterm modifier parameter (`1 + bitmask`; 0 or 1 = none).
#[allow(clippy::cast_possible_truncation)]
const fn decode_modifiers(param: u16) -> Modifiers {
    let val = if param > 0 { param - 1 } else { 0 };
    Modifiers::from_bits_truncate(val as u8)
}

/// Expected byte length of a UTF-8 character from its lead byte.
/// Returns 0 for invalid lead bytes.
const fn utf8_char_len(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 0,
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
