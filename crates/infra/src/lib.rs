//! # `URLBridge` Infrastructure
//!
//! Implementations of the `urlbridge-core` ports.
//!
//! This crate contains:
//! - Platform-specific code (Apple Events, `NSRunningApplication`)
//! - Fallbacks for non-macOS targets
//! - Configuration loading
//! - Logging bootstrap
//!
//! ## Architecture
//! - Implements traits defined in `urlbridge-core`
//! - Contains all "impure" code (I/O, platform APIs)

pub mod config;
pub mod observability;
pub mod platform;

// Re-export commonly used items
pub use platform::*;
