// SPDX-License-Identifier: MIT
//
// Escape sequences.
//
// Stateless writers for the VT100/xterm controls the editor sends. They
// take any `io::Write`; the renderer hands them a Vec, the terminal guard
// hands them a locked stdout. Coordinates are 0-based on our side and
// become 1-based on the wire.

use std::fmt::Write as _;
use std::io::{self, Write};

use crate::cell::{Attr, Style};
use crate::color::CellColor;

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// CUP: put the cursor at column `x`, row `y`.
pub fn cursor_to(w: &mut impl Write, x: u16, y: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1)
}

pub fn cursor_home(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[H")
}

/// Drive the cursor into the bottom-right corner.
///
/// CUF and CUD clamp at the screen edge, so a large count works for any
/// window. Followed by [`request_cursor_position`] this measures the
/// screen without `TIOCGWINSZ`.
pub fn cursor_to_bottom_right(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[999C\x1b[999B")
}

/// DSR 6. The terminal answers on stdin with `ESC [ row ; col R`.
pub fn request_cursor_position(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[6n")
}

pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

// ─── Screen ──────────────────────────────────────────────────────────────────

pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[2J")
}

/// SGR 0: back to the terminal's default rendition.
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[m")
}

// ─── Rendition ───────────────────────────────────────────────────────────────

const ATTR_CODES: [(Attr, &str); 3] = [
    (Attr::BOLD, "1"),
    (Attr::UNDERLINE, "4"),
    (Attr::INVERSE, "7"),
];

/// Select `style` from scratch in a single SGR sequence.
///
/// The sequence opens with `0`, so nothing left over from the previous
/// cell survives. Default colors are implied by that reset and are not
/// repeated.
pub fn style(w: &mut impl Write, style: Style) -> io::Result<()> {
    let mut seq = String::from("\x1b[0");
    for (flag, code) in ATTR_CODES {
        if style.attrs.contains(flag) {
            seq.push(';');
            seq.push_str(code);
        }
    }
    push_color(&mut seq, style.fg, style.fg.fg_sgr(), 38);
    push_color(&mut seq, style.bg, style.bg.bg_sgr(), 48);
    seq.push('m');
    w.write_all(seq.as_bytes())
}

fn push_color(seq: &mut String, color: CellColor, short: Option<u8>, extended: u8) {
    match (color, short) {
        (CellColor::Default, _) => {}
        (_, Some(code)) => {
            let _ = write!(seq, ";{code}");
        }
        (CellColor::Ansi256(n), None) => {
            let _ = write!(seq, ";{extended};5;{n}");
        }
    }
}

// ─── Modes ───────────────────────────────────────────────────────────────────

/// DEC 2026: hold screen updates until [`end_sync`]. Ignored where unsupported.
pub fn begin_sync(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?2026h")
}

pub fn end_sync(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?2026l")
}

/// DEC 1049: switch to the alternate screen so the shell's scrollback
/// comes back untouched on exit.
pub fn enter_alt_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049h")
}

pub fn exit_alt_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049l")
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bytes(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn cursor_position_is_one_based() {
        assert_eq!(bytes(|w| cursor_to(w, 0, 0)), "\x1b[1;1H");
        assert_eq!(bytes(|w| cursor_to(w, 4, 9)), "\x1b[10;5H");
        assert_eq!(bytes(|w| cursor_to(w, u16::MAX, 0)), "\x1b[1;65536H");
    }

    #[test]
    fn fixed_sequences() {
        assert_eq!(bytes(|w| cursor_home(w)), "\x1b[H");
        assert_eq!(bytes(|w| cursor_hide(w)), "\x1b[?25l");
        assert_eq!(bytes(|w| cursor_show(w)), "\x1b[?25h");
        assert_eq!(bytes(|w| clear_screen(w)), "\x1b[2J");
        assert_eq!(bytes(|w| reset(w)), "\x1b[m");
        assert_eq!(bytes(|w| cursor_to_bottom_right(w)), "\x1b[999C\x1b[999B");
        assert_eq!(bytes(|w| request_cursor_position(w)), "\x1b[6n");
        assert_eq!(bytes(|w| begin_sync(w)), "\x1b[?2026h");
        assert_eq!(bytes(|w| end_sync(w)), "\x1b[?2026l");
        assert_eq!(bytes(|w| enter_alt_screen(w)), "\x1b[?1049h");
        assert_eq!(bytes(|w| exit_alt_screen(w)), "\x1b[?1049l");
    }

    #[test]
    fn plain_style_is_bare_reset() {
        assert_eq!(bytes(|w| style(w, Style::PLAIN)), "\x1b[0m");
    }

    #[test]
    fn inverse_style() {
        assert_eq!(bytes(|w| style(w, Style::INVERSE)), "\x1b[0;7m");
    }

    #[test]
    fn highlight_colors() {
        assert_eq!(bytes(|w| style(w, Style::colored(CellColor::RED))), "\x1b[0;31m");
        assert_eq!(
            bytes(|w| style(w, Style::colored(CellColor::YELLOW).on(CellColor::BLUE))),
            "\x1b[0;33;44m"
        );
    }

    #[test]
    fn attrs_then_extended_colors() {
        let s = Style::colored(CellColor::Ansi256(208))
            .on(CellColor::Ansi256(17))
            .with_attrs(Attr::BOLD | Attr::UNDERLINE);
        assert_eq!(bytes(|w| style(w, s)), "\x1b[0;1;4;38;5;208;48;5;17m");
    }
}
