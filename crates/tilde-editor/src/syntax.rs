//! Syntax highlighting: a keyword, string, number and comment classifier.
//!
//! Each rendered byte of a line gets a [`Highlight`] class. Classification is
//! a single left-to-right pass over one line with no state carried between
//! lines: an unterminated string or comment ends at the end of its line.
//!
//! # Rules
//!
//! At each position the first rule that applies wins:
//!
//! 1. The profile's line-comment token (outside a string) colors the rest of
//!    the line as [`Highlight::Comment`].
//! 2. Inside a string everything is [`Highlight::String`]; a backslash also
//!    claims the byte after it, and the opening quote character closes the
//!    string. A `"` or `'` opens one.
//! 3. A digit after a separator or after another number byte, or a `.` right
//!    after a number byte, is [`Highlight::Number`].
//! 4. After a separator, a keyword followed by a separator (or the end of the
//!    line) is [`Highlight::Keyword1`], or [`Highlight::Keyword2`] for
//!    keywords listed with a trailing `|`.
//! 5. Anything else is [`Highlight::Normal`].
//!
//! Profiles live in a static table and are picked by filename with
//! [`select`].

use bitflags::bitflags;
use tilde_term::color::CellColor;

// ---------------------------------------------------------------------------
// Highlight classes
// ---------------------------------------------------------------------------

/// Classification of one rendered byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Highlight {
    #[default]
    Normal,
    Comment,
    Keyword1,
    Keyword2,
    String,
    Number,
    /// The current search match. Never produced by the classifier; the
    /// renderer lays it over the base classes.
    Match,
}

impl Highlight {
    /// Foreground color used to draw this class.
    #[must_use]
    pub const fn color(self) -> CellColor {
        match self {
            Self::Normal => CellColor::Default,
            Self::Comment => CellColor::CYAN,
            Self::Keyword1 => CellColor::YELLOW,
            Self::Keyword2 => CellColor::GREEN,
            Self::String => CellColor::MAGENTA,
            Self::Number => CellColor::RED,
            Self::Match => CellColor::BLUE,
        }
    }
}

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

bitflags! {
    /// Optional rules a profile turns on.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SyntaxFlags: u8 {
        const NUMBERS = 0b01;
        const STRINGS = 0b10;
    }
}

/// Suffix that marks a keyword as secondary (types, in the C profile).
const KEYWORD2_MARKER: u8 = b'|';

/// A language profile.
#[derive(Debug, PartialEq, Eq)]
pub struct Syntax {
    /// Name shown in the status bar.
    pub filetype: &'static str,
    /// Patterns matched against the filename. A leading `.` means "the
    /// extension equals this"; anything else is a substring match.
    pub filematch: &'static [&'static str],
    /// Keywords; a trailing `|` marks a secondary keyword.
    pub keywords: &'static [&'static str],
    /// Token that starts a comment running to the end of the line.
    pub line_comment: &'static str,
    pub flags: SyntaxFlags,
}

/// Built-in profiles, searched in order.
pub static HLDB: &[Syntax] = &[Syntax {
    filetype: "c",
    filematch: &[".c", ".h", ".cpp"],
    keywords: &[
        "switch", "if", "while", "for", "break", "continue", "return", "else", "struct", "union",
        "typedef", "static", "enum", "class", "case", "int|", "long|", "double|", "float|",
        "char|", "unsigned|", "signed|", "void|",
    ],
    line_comment: "//",
    flags: SyntaxFlags::NUMBERS.union(SyntaxFlags::STRINGS),
}];

/// Pick the profile for `filename`, if any.
///
/// The extension is everything from the last `.` on, so `a.tar.c` is a C
/// file and `Makefile` has no extension.
#[must_use]
pub fn select(filename: &str) -> Option<&'static Syntax> {
    let ext = filename.rfind('.').map(|i| &filename[i..]);

    HLDB.iter().find(|syntax| {
        syntax.filematch.iter().any(|pattern| {
            if pattern.starts_with('.') {
                ext == Some(*pattern)
            } else {
                filename.contains(pattern)
            }
        })
    })
}

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

/// Whether `c` ends a keyword or may precede a number.
#[must_use]
pub fn is_separator(c: u8) -> bool {
    c.is_ascii_whitespace() || c == 0 || b",.()+-/*=~%<>[];".contains(&c)
}

/// Classify every byte of a rendered line.
///
/// The result always has the same length as `render`. Without a profile
/// every byte is [`Highlight::Normal`].
#[must_use]
pub fn highlight_line(render: &[u8], syntax: Option<&Syntax>) -> Vec<Highlight> {
    let mut hl = vec![Highlight::Normal; render.len()];
    let Some(syntax) = syntax else {
        return hl;
    };

    let comment = syntax.line_comment.as_bytes();
    let mut prev_sep = true;
    let mut in_string: Option<u8> = None;
    let mut i = 0;

    while i < render.len() {
        let c = render[i];
        let prev_hl = if i > 0 { hl[i - 1] } else { Highlight::Normal };

        if !comment.is_empty() && in_string.is_none() && render[i..].starts_with(comment) {
            hl[i..].fill(Highlight::Comment);
            break;
        }

        if syntax.flags.contains(SyntaxFlags::STRINGS) {
            if let Some(quote) = in_string {
                hl[i] = Highlight::String;
                if c == b'\\' && i + 1 < render.len() {
                    hl[i + 1] = Highlight::String;
                    i += 2;
                    continue;
                }
                if c == quote {
                    in_string = None;
                }
                i += 1;
                prev_sep = true;
                continue;
            }
            if c == b'"' || c == b'\'' {
                in_string = Some(c);
                hl[i] = Highlight::String;
                i += 1;
                continue;
            }
        }

        if syntax.flags.contains(SyntaxFlags::NUMBERS)
            && ((c.is_ascii_digit() && (prev_sep || prev_hl == Highlight::Number))
                || (c == b'.' && prev_hl == Highlight::Number))
        {
            hl[i] = Highlight::Number;
            i += 1;
            prev_sep = false;
            continue;
        }

        if prev_sep {
            if let Some((len, class)) = match_keyword(&render[i..], syntax.keywords) {
                hl[i..i + len].fill(class);
                i += len;
                prev_sep = false;
                continue;
            }
        }

        prev_sep = is_separator(c);
        i += 1;
    }

    hl
}

/// First keyword that `text` starts with and that ends at a separator.
fn match_keyword(text: &[u8], keywords: &[&str]) -> Option<(usize, Highlight)> {
    keywords.iter().find_map(|keyword| {
        let (word, class) = match keyword.as_bytes().split_last() {
            Some((&KEYWORD2_MARKER, word)) => (word, Highlight::Keyword2),
            _ => (keyword.as_bytes(), Highlight::Keyword1),
        };
        let boundary = text.get(word.len()).copied().unwrap_or(0);
        (!word.is_empty() && text.starts_with(word) && is_separator(boundary))
            .then_some((word.len(), class))
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
