//! The status message: one line of feedback that fades after a timeout.

use std::time::{Duration, Instant};

/// The message-bar text and when it was set.
#[derive(Debug, Clone, Default)]
pub struct StatusMessage {
    text: String,
    set_at: Option<Instant>,
}

impl StatusMessage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the message and restart its timer.
    pub fn set(&mut self, text: impl Into<String>) {
        self.set_at_time(text, Instant::now());
    }

    /// [`set`](Self::set) with an explicit timestamp.
    pub fn set_at_time(&mut self, text: impl Into<String>, at: Instant) {
        self.text = text.into();
        self.set_at = Some(at);
    }

    /// The raw text, whether or not it has expired.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The text if it was set less than `timeout` before `now`.
    #[must_use]
    pub fn visible_at(&self, now: Instant, timeout: Duration) -> Option<&str> {
        let set_at = self.set_at?;
        (!self.text.is_empty() && now.saturating_duration_since(set_at) < timeout)
            .then_some(self.text.as_str())
    }

    /// [`visible_at`](Self::visible_at) for the current time.
    #[must_use]
    pub fn visible(&self, timeout: Duration) -> Option<&str> {
        self.visible_at(Instant::now(), timeout)
    }
}
