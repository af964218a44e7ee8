// SPDX-License-Identifier: MIT
//
// Cells and their styles.
//
// A Cell is one screen column: a glyph plus the Style it is drawn with.
// A glyph two columns wide puts its character in the left cell and marks
// the right cell as its tail. Tails carry a style so a background still
// reaches the second column, but they never produce text of their own.

use std::fmt;

use crate::color::CellColor;

// ─── Attr ────────────────────────────────────────────────────────────────────

bitflags::bitflags! {
    /// SGR rendition flags.
    ///
    /// ```
    /// use tilde_term::cell::Attr;
    ///
    /// let bar = Attr::INVERSE;
    /// assert!(bar.contains(Attr::INVERSE));
    /// assert!(!bar.contains(Attr::BOLD));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Attr: u8 {
        const BOLD      = 0b001;
        const UNDERLINE = 0b010;
        /// Swap foreground and background. Status bar and control bytes.
        const INVERSE   = 0b100;
    }
}

// ─── Style ───────────────────────────────────────────────────────────────────

/// Everything about a cell except its character.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Style {
    pub fg: CellColor,
    pub bg: CellColor,
    pub attrs: Attr,
}

impl Style {
    /// Terminal defaults, no attributes.
    pub const PLAIN: Self = Self {
        fg: CellColor::Default,
        bg: CellColor::Default,
        attrs: Attr::empty(),
    };

    /// Default colors, video reversed.
    pub const INVERSE: Self = Self {
        attrs: Attr::INVERSE,
        ..Self::PLAIN
    };

    /// Plain style with a foreground color.
    #[must_use]
    pub const fn colored(fg: CellColor) -> Self {
        Self { fg, ..Self::PLAIN }
    }

    #[must_use]
    pub const fn on(self, bg: CellColor) -> Self {
        Self { bg, ..self }
    }

    #[must_use]
    pub const fn with_attrs(self, attrs: Attr) -> Self {
        Self { attrs, ..self }
    }
}

impl fmt::Debug for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.fg, self.bg)?;
        if !self.attrs.is_empty() {
            write!(f, " {:?}", self.attrs)?;
        }
        Ok(())
    }
}

// ─── Cell ────────────────────────────────────────────────────────────────────

/// One screen column.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// `None` marks the right half of a double-width glyph.
    glyph: Option<char>,
    pub style: Style,
}

impl Cell {
    /// A plain space. Frames are cleared to this.
    pub const BLANK: Self = Self::new(' ');

    #[must_use]
    pub const fn new(ch: char) -> Self {
        Self::styled(ch, Style::PLAIN)
    }

    #[must_use]
    pub const fn styled(ch: char, style: Style) -> Self {
        Self {
            glyph: Some(ch),
            style,
        }
    }

    /// The right half of a double-width glyph.
    #[must_use]
    pub const fn tail(style: Style) -> Self {
        Self { glyph: None, style }
    }

    /// The character shown here, or `None` for a tail.
    #[inline]
    #[must_use]
    pub const fn character(self) -> Option<char> {
        self.glyph
    }

    #[inline]
    #[must_use]
    pub const fn is_wide_tail(self) -> bool {
        self.glyph.is_none()
    }

    /// Same style, character replaced by a space.
    #[must_use]
    pub const fn blanked(self) -> Self {
        Self::styled(' ', self.style)
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::BLANK
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.glyph {
            Some(ch) => write!(f, "{ch:?}")?,
            None => f.write_str("<tail>")?,
        }
        if self.style != Style::PLAIN {
            write!(f, " [{:?}]", self.style)?;
        }
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_stays_small() {
        assert!(std::mem::size_of::<Cell>() <= 8);
    }

    #[test]
    fn blank_is_default_space() {
        assert_eq!(Cell::default(), Cell::BLANK);
        assert_eq!(Cell::BLANK.character(), Some(' '));
        assert_eq!(Cell::BLANK.style, Style::PLAIN);
    }

    #[test]
    fn style_builders() {
        let s = Style::colored(CellColor::GREEN)
            .on(CellColor::BLUE)
            .with_attrs(Attr::BOLD);
        assert_eq!(s.fg, CellColor::GREEN);
        assert_eq!(s.bg, CellColor::BLUE);
        assert_eq!(s.attrs, Attr::BOLD);
        assert_eq!(Style::INVERSE.fg, CellColor::Default);
        assert!(Style::INVERSE.attrs.contains(Attr::INVERSE));
    }

    #[test]
    fn tail_has_no_character_but_keeps_style() {
        let t = Cell::tail(Style::INVERSE);
        assert!(t.is_wide_tail());
        assert_eq!(t.character(), None);
        assert_eq!(t.style, Style::INVERSE);
        assert!(!Cell::new('~').is_wide_tail());
    }

    #[test]
    fn blanked_keeps_style() {
        let c = Cell::styled('x', Style::colored(CellColor::RED)).blanked();
        assert_eq!(c.character(), Some(' '));
        assert_eq!(c.style.fg, CellColor::RED);
    }

    #[test]
    fn debug_output() {
        assert_eq!(format!("{:?}", Cell::new('a')), "'a'");
        assert_eq!(
            format!("{:?}", Cell::styled('#', Style::colored(CellColor::CYAN))),
            "'#' [ansi(6)/default]"
        );
        assert_eq!(format!("{:?}", Cell::tail(Style::PLAIN)), "<tail>");
    }
}
