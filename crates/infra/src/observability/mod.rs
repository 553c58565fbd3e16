//! Observability infrastructure
//!
//! The bridge reports through `tracing` only. This module installs the
//! process-wide subscriber; hosts that install their own may skip it.

pub mod logging;

pub use logging::{init_logging, level_directive};
