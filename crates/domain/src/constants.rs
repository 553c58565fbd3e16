//! Bridge constants
//!
//! Centralized location for defaults shared by the config loader and the
//! platform adapters.

// Event loop
/// Longest wait between stop checks in the event loop.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

// Hand-off
/// Default time a receiver waits for the next URL event.
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 4000;
/// Message carried by `BridgeError::Timeout` from `wait_for_url`.
pub const WAIT_TIMEOUT_MESSAGE: &str = "failed to get url event, timeout reached";

// Logging
/// Level used when none is configured or the configured one is unknown.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// Config discovery
/// File name (without extension) the config loader probes for.
pub const CONFIG_FILE_STEM: &str = "urlbridge";
/// Prefix of the environment overrides, e.g. `URLBRIDGE_LOG_LEVEL`.
pub const ENV_PREFIX: &str = "URLBRIDGE_";
