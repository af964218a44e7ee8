//! Single-line input on the message bar.
//!
//! The editor has a closed set of prompts ([`PromptMode`]). While one is
//! open every key goes to [`Prompt::handle_key`], which edits the input and
//! reports when the user accepts or cancels. What happens then is up to the
//! caller, which matches on the mode.

use tilde_term::input::{KeyCode, KeyEvent};

/// Which prompt is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PromptMode {
    #[default]
    None,
    SaveAs,
    Search,
}

impl PromptMode {
    /// Message-bar text for this prompt with the current `input`.
    #[must_use]
    pub fn message(self, input: &str) -> String {
        match self {
            Self::None => String::new(),
            Self::SaveAs => format!("Save as: {input} (ESC to cancel)"),
            Self::Search => format!("Search: {input} (ESC/Enter to cancel, Arrows to navigate)"),
        }
    }
}

/// Result of feeding one key to the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    /// Still editing.
    Pending,
    /// Enter on non-empty input. The prompt is closed.
    Accepted(String),
    /// Escape. The prompt is closed.
    Cancelled,
}

/// An open (or closed) prompt and its input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prompt {
    mode: PromptMode,
    input: String,
}

impl Prompt {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `mode` with empty input.
    pub fn open(&mut self, mode: PromptMode) {
        self.mode = mode;
        self.input.clear();
    }

    #[must_use]
    pub const fn mode(&self) -> PromptMode {
        self.mode
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.mode != PromptMode::None
    }

    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Message-bar text for the current state.
    #[must_use]
    pub fn message(&self) -> String {
        self.mode.message(&self.input)
    }

    /// Edit the input with `key`.
    pub fn handle_key(&mut self, key: &KeyEvent) -> PromptOutcome {
        match key.code {
            KeyCode::Backspace | KeyCode::Delete => {
                self.input.pop();
            }
            KeyCode::Char('h') if key.is_ctrl('h') => {
                self.input.pop();
            }
            KeyCode::Escape => {
                self.close();
                return PromptOutcome::Cancelled;
            }
            KeyCode::Enter if !self.input.is_empty() => {
                let input = std::mem::take(&mut self.input);
                self.close();
                return PromptOutcome::Accepted(input);
            }
            KeyCode::Char(c) if key.modifiers.is_empty() && c.is_ascii() && !c.is_ascii_control() => {
                self.input.push(c);
            }
            _ => {}
        }
        PromptOutcome::Pending
    }

    fn close(&mut self) {
        self.mode = PromptMode::None;
        self.input.clear();
    }
}
