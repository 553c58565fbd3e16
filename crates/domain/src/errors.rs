//! Error types used throughout the bridge

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for `URLBridge`
///
/// A lookup miss is not an error: it is an empty
/// [`ApplicationInfo`](crate::ApplicationInfo).
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum BridgeError {
    /// The OS refused or could not accept the URL event handler.
    #[error("Registration error: {0}")]
    Registration(String),

    /// `start()` while the bridge is already running.
    #[error("Bridge is already running")]
    AlreadyRunning,

    /// Another bridge in this process owns the handler registration.
    #[error("URL event handler already claimed by another bridge in this process")]
    AlreadyClaimed,

    /// The OS API is unavailable here, e.g. not macOS or not the main thread.
    #[error("Platform error: {0}")]
    Platform(String),

    /// Config file or environment override could not be used.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed caller input such as an unknown criterion key.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No URL event arrived within the wait window.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Every sender of the hand-off channel is gone.
    #[error("URL event channel closed")]
    ChannelClosed,
}

impl BridgeError {
    /// Stable label for structured logging.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Registration(_) => "registration",
            Self::AlreadyRunning => "already_running",
            Self::AlreadyClaimed => "already_claimed",
            Self::Platform(_) => "platform",
            Self::Config(_) => "config",
            Self::InvalidInput(_) => "invalid_input",
            Self::Timeout(_) => "timeout",
            Self::ChannelClosed => "channel_closed",
        }
    }

    /// Whether the bridge can never deliver a URL after this error.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Registration(_) | Self::Platform(_) | Self::AlreadyClaimed)
    }
}

/// Result type alias for `URLBridge` operations
pub type Result<T> = std::result::Result<T, BridgeError>;
