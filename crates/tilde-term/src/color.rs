// SPDX-License-Identifier: MIT
//
// Colors.
//
// The editor only ever asks for the eight classic ANSI colors or the
// terminal's own default, so those have names and short SGR codes. Palette
// entries 8–255 go out in the `38;5;n` / `48;5;n` form.

use std::fmt;

/// A cell color.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellColor {
    /// Whatever the terminal is configured to show.
    #[default]
    Default,
    /// Entry in the 256-color palette.
    Ansi256(u8),
}

impl CellColor {
    pub const BLACK: Self = Self::Ansi256(0);
    pub const RED: Self = Self::Ansi256(1);
    pub const GREEN: Self = Self::Ansi256(2);
    pub const YELLOW: Self = Self::Ansi256(3);
    pub const BLUE: Self = Self::Ansi256(4);
    pub const MAGENTA: Self = Self::Ansi256(5);
    pub const CYAN: Self = Self::Ansi256(6);
    pub const WHITE: Self = Self::Ansi256(7);

    /// Foreground SGR code: `30..=37` or `39`. `None` for the extended palette.
    #[must_use]
    pub const fn fg_sgr(self) -> Option<u8> {
        self.short_code(30)
    }

    /// Background SGR code: `40..=47` or `49`. `None` for the extended palette.
    #[must_use]
    pub const fn bg_sgr(self) -> Option<u8> {
        self.short_code(40)
    }

    const fn short_code(self, base: u8) -> Option<u8> {
        match self {
            Self::Default => Some(base + 9),
            Self::Ansi256(n) if n < 8 => Some(base + n),
            Self::Ansi256(_) => None,
        }
    }
}

impl fmt::Debug for CellColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("default"),
            Self::Ansi256(n) => write!(f, "ansi({n})"),
        }
    }
}

impl fmt::Display for CellColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_colors_use_short_codes() {
        assert_eq!(CellColor::RED.fg_sgr(), Some(31));
        assert_eq!(CellColor::CYAN.fg_sgr(), Some(36));
        assert_eq!(CellColor::BLUE.bg_sgr(), Some(44));
        assert_eq!(CellColor::BLACK.bg_sgr(), Some(40));
    }

    #[test]
    fn default_color_codes() {
        assert_eq!(CellColor::default(), CellColor::Default);
        assert_eq!(CellColor::Default.fg_sgr(), Some(39));
        assert_eq!(CellColor::Default.bg_sgr(), Some(49));
    }

    #[test]
    fn extended_palette_needs_long_form() {
        assert_eq!(CellColor::Ansi256(8).fg_sgr(), None);
        assert_eq!(CellColor::Ansi256(255).bg_sgr(), None);
    }

    #[test]
    fn formatting() {
        assert_eq!(CellColor::MAGENTA.to_string(), "ansi(5)");
        assert_eq!(format!("{:?}", CellColor::Default), "default");
    }
}
