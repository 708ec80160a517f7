//! Transient status messages shown in the message bar.

use std::time::{Duration, Instant};

/// A message with the time it was set.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    /// The message text.
    pub text: String,
    /// When the message was set.
    pub created_at: Instant,
}

impl StatusMessage {
    /// Creates a message stamped with the current time.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            created_at: Instant::now(),
        }
    }

    /// Returns whether the message is older than `timeout`.
    pub fn is_expired(&self, timeout: Duration) -> bool {
        self.created_at.elapsed() >= timeout
    }

    /// Returns the text while it is still fresh.
    pub fn visible_text(&self, timeout: Duration) -> Option<&str> {
        if self.text.is_empty() || self.is_expired(timeout) {
            None
        } else {
            Some(&self.text)
        }
    }
}

impl Default for StatusMessage {
    fn default() -> Self {
        Self::new("")
    }
}
