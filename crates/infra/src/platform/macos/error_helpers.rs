//! Error mapping helpers for macOS platform operations
//!
//! # Error Mapping Strategy
//!
//! - Handler installation failures → `BridgeError::Registration` (fatal: no
//!   URL will ever be delivered)
//! - Calling AppKit off the main thread → `BridgeError::Platform`

use urlbridge_domain::BridgeError;

/// Create a registration error for a handler that could not be installed.
///
/// # Examples
///
/// ```rust,ignore
/// let manager = shared_event_manager().ok_or_else(|| {
///     registration_error("NSAppleEventManager unavailable")
/// })?;
/// ```
#[inline]
pub(crate) fn registration_error(reason: &str) -> BridgeError {
    BridgeError::Registration(format!("could not install get-URL handler: {reason}"))
}

/// AppKit event processing only works on the main thread.
#[inline]
pub(crate) fn main_thread_error(operation: &str) -> BridgeError {
    BridgeError::Platform(format!("{operation} must be called from the main thread"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_error() {
        match registration_error("denied") {
            BridgeError::Registration(msg) => {
                assert!(msg.contains("get-URL handler"));
                assert!(msg.contains("denied"));
            }
            other => panic!("Expected Registration error, got {other:?}"),
        }
    }

    #[test]
    fn test_main_thread_error() {
        match main_thread_error("AppleEventUrlBridge::start") {
            BridgeError::Platform(msg) => {
                assert!(msg.contains("AppleEventUrlBridge::start"));
                assert!(msg.contains("main thread"));
            }
            other => panic!("Expected Platform error, got {other:?}"),
        }
    }
}
