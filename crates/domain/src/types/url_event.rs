//! Decoded URL events

use serde::{Deserialize, Serialize};

/// One decoded "get URL" Apple Event.
///
/// Both values are passed through exactly as the OS decoded them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlEvent {
    /// URL text exactly as the OS decoded it.
    pub url: String,
    /// Process id of the sender, 0 when the event carried none.
    pub sender_pid: i32,
}

impl UrlEvent {
    /// Build an event from its two raw parts.
    #[must_use]
    pub fn new(url: impl Into<String>, sender_pid: i32) -> Self {
        Self { url: url.into(), sender_pid }
    }
}
