//! # `URLBridge` Domain
//!
//! Value types shared by every `URLBridge` crate.
//!
//! This crate contains:
//! - `ApplicationInfo` and `UrlEvent`, the two values the bridge hands out
//! - The `BridgeError` type and `Result` alias
//! - `BridgeConfig` and its defaults
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other `URLBridge` crates
//! - No platform code

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
