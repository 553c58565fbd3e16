//! macOS Platform Integration
//!
//! # Modules
//!
//! - [`url_events`] - `NSAppleEventManager` "get URL" bridge
//! - [`running_app`] - `NSRunningApplication` metadata lookup
//! - [`error_helpers`] - Error mapping utilities
//!
//! # Threading
//!
//! - **URL events**: `start()` must run on the main thread, which it blocks
//! - **Lookup**: any thread
//!
//! No special permissions are needed for either. Receiving URL events in
//! practice requires the process to be a bundled app that declares its URL
//! schemes in `CFBundleURLTypes`.

pub mod error_helpers;
pub mod running_app;
pub mod url_events;

// Re-export main types
pub use running_app::RunningApplicationLookup;
pub use url_events::AppleEventUrlBridge;
