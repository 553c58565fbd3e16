//! # `URLBridge` API
//!
//! Host-side wiring for the `urlbridge-probe` diagnostic binary: argument
//! parsing, the dependency context, and the listen-once flow.

pub mod args;
pub mod context;
pub mod probe;

pub use args::ProbeArgs;
pub use context::ProbeContext;
