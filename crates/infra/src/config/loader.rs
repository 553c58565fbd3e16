//! Configuration loader
//!
//! Loads `BridgeConfig` from a file, then applies environment overrides.
//!
//! ## Loading Strategy
//! 1. Probe the standard locations for a config file
//! 2. Fall back to defaults when none exists
//! 3. Apply `URLBRIDGE_*` environment overrides
//! 4. Validate
//!
//! ## Environment Variables
//! - `URLBRIDGE_POLL_INTERVAL_MS`: Event loop poll interval in milliseconds
//! - `URLBRIDGE_WAIT_TIMEOUT_MS`: Hand-off wait timeout in milliseconds
//! - `URLBRIDGE_LOG_LEVEL`: `trace`, `debug`, `info`, `warn` or `error`
//! - `URLBRIDGE_JSON_LOGS`: JSON log output (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./urlbridge.toml` or `./urlbridge.json` (current working directory)
//! 2. `./config.toml` or `./config.json` (current working directory)
//! 3. `$HOME/.config/urlbridge.toml` or `$HOME/.config/urlbridge.json`
//! 4. Relative to executable location

use std::path::{Path, PathBuf};

use urlbridge_domain::constants::{CONFIG_FILE_STEM, ENV_PREFIX};
use urlbridge_domain::{BridgeConfig, BridgeError, Result};

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `BridgeError::Config` if a config file exists but cannot be
/// parsed, an environment override is malformed, or validation fails.
pub fn load() -> Result<BridgeConfig> {
    let config = match probe_config_paths() {
        Some(path) => load_from_file(Some(path))?,
        None => {
            tracing::debug!("No config file found, using defaults");
            BridgeConfig::default()
        }
    };

    load_from_env(config)
}

/// Apply environment overrides to `base`
///
/// Unset variables leave the corresponding field untouched.
///
/// # Errors
/// Returns `BridgeError::Config` if a variable has an invalid value.
pub fn load_from_env(base: BridgeConfig) -> Result<BridgeConfig> {
    let mut config = base;

    if let Some(value) = env_var("POLL_INTERVAL_MS") {
        config.poll_interval_ms = parse_millis("poll interval", &value)?;
    }
    if let Some(value) = env_var("WAIT_TIMEOUT_MS") {
        config.wait_timeout_ms = parse_millis("wait timeout", &value)?;
    }
    if let Some(value) = env_var("LOG_LEVEL") {
        config.log_level = value;
    }
    if let Some(value) = env_var("JSON_LOGS") {
        config.json_logs = parse_bool(&value);
    }

    validate(&config)?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both TOML and JSON formats (detected by file extension).
/// Environment overrides are not applied; use [`load`] for that.
///
/// # Errors
/// Returns `BridgeError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<BridgeConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(BridgeError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            BridgeError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| BridgeError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    validate(&config)?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.toml` or `.json`).
fn parse_config(contents: &str, path: &Path) -> Result<BridgeConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| BridgeError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| BridgeError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(BridgeError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    // Try current working directory
    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(named_candidates(&cwd, CONFIG_FILE_STEM));
        candidates.extend(named_candidates(&cwd, "config"));
    }

    // Try the user config directory
    if let Some(home) = std::env::var_os("HOME") {
        candidates.extend(named_candidates(&PathBuf::from(home).join(".config"), CONFIG_FILE_STEM));
    }

    // Try relative to executable
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(named_candidates(exe_dir, CONFIG_FILE_STEM));
        }
    }

    // Return first existing candidate
    candidates.into_iter().find(|path| path.exists())
}

fn named_candidates(dir: &Path, stem: &str) -> [PathBuf; 2] {
    [dir.join(format!("{stem}.toml")), dir.join(format!("{stem}.json"))]
}

fn validate(config: &BridgeConfig) -> Result<()> {
    if config.poll_interval_ms == 0 {
        return Err(BridgeError::Config("poll_interval_ms must be greater than zero".to_string()));
    }
    Ok(())
}

/// Read `URLBRIDGE_<suffix>`, treating an empty value as unset.
fn env_var(suffix: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}{suffix}")).ok().filter(|v| !v.trim().is_empty())
}

fn parse_millis(what: &str, value: &str) -> Result<u64> {
    value.trim().parse::<u64>().map_err(|e| BridgeError::Config(format!("Invalid {what}: {e}")))
}

/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
