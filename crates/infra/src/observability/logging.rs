//! `tracing-subscriber` bootstrap
//!
//! `RUST_LOG` wins over the configured level when it is set. Logs go to
//! stderr so stdout stays free for host output.

use tracing_subscriber::EnvFilter;
use urlbridge_domain::constants::DEFAULT_LOG_LEVEL;
use urlbridge_domain::{BridgeConfig, BridgeError, Result};

/// Install the global subscriber described by `config`.
///
/// # Errors
/// Returns `BridgeError::Config` if a global subscriber is already set.
pub fn init_logging(config: &BridgeConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_directive(&config.log_level)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    let installed = if config.json_logs { builder.json().try_init() } else { builder.try_init() };
    installed.map_err(|e| BridgeError::Config(format!("Failed to install log subscriber: {e}")))?;

    tracing::debug!(level = %config.log_level, json = config.json_logs, "logging initialized");
    Ok(())
}

/// Map a configured level name to a filter directive.
///
/// Case-insensitive; unknown names fall back to `info`.
pub fn level_directive(level: &str) -> &'static str {
    match level.trim().to_ascii_uppercase().as_str() {
        "TRACE" => "trace",
        "DEBUG" => "debug",
        "INFO" => "info",
        "WARN" | "WARNING" => "warn",
        "ERROR" => "error",
        _ => DEFAULT_LOG_LEVEL,
    }
}
