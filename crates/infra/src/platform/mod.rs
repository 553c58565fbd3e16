//! Platform-specific implementations
//!
//! # Platform Support
//!
//! - **macOS**: Apple Event URL bridge and `NSRunningApplication` lookup
//! - **Other platforms**: Fallback stubs (bridge start returns a platform
//!   error, lookup always misses)
//!
//! Host code should use the [`NativeUrlBridge`] and [`NativeProcessLookup`]
//! aliases.

#[cfg(target_os = "macos")]
pub mod macos;

#[cfg(target_os = "macos")]
pub use macos::{AppleEventUrlBridge as NativeUrlBridge, RunningApplicationLookup as NativeProcessLookup};

pub mod fallback {
    use std::sync::Arc;
    use std::time::Duration;

    use urlbridge_core::{BridgeLifecycle, ProcessLookup, StopHandle, UrlCallback, UrlEventSource};
    use urlbridge_domain::{ApplicationInfo, BridgeError, Result};

    /// Fallback URL bridge for unsupported platforms.
    ///
    /// Start always fails; there is no OS handler to register.
    pub struct FallbackUrlBridge {
        lifecycle: Arc<BridgeLifecycle>,
    }

    impl std::fmt::Debug for FallbackUrlBridge {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("FallbackUrlBridge").finish_non_exhaustive()
        }
    }

    impl FallbackUrlBridge {
        /// Same signature as the native bridge; both arguments are ignored.
        #[allow(clippy::unnecessary_wraps)]
        pub fn new(_callback: UrlCallback, _poll_interval: Duration) -> Result<Self> {
            Ok(Self { lifecycle: Arc::new(BridgeLifecycle::new()) })
        }

        pub const fn delivered(&self) -> u64 {
            0
        }
    }

    impl UrlEventSource for FallbackUrlBridge {
        fn start(&mut self) -> Result<()> {
            Err(BridgeError::Platform("URL event handling is only supported on macOS".to_string()))
        }

        fn stop(&self) {}

        fn is_running(&self) -> bool {
            false
        }

        fn stop_handle(&self) -> StopHandle {
            StopHandle::new(Arc::clone(&self.lifecycle))
        }

        fn is_supported() -> bool {
            false
        }
    }

    /// Fallback lookup: every pid is a miss.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct FallbackProcessLookup;

    impl FallbackProcessLookup {
        #[must_use]
        pub const fn new() -> Self {
            Self
        }
    }

    impl ProcessLookup for FallbackProcessLookup {
        fn lookup_process(&self, pid: i32) -> ApplicationInfo {
            tracing::debug!(pid, "process lookup unsupported on this platform");
            ApplicationInfo::default()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_fallback_bridge() {
            let mut bridge = FallbackUrlBridge::new(Box::new(|_| {}), Duration::ZERO).unwrap();
            assert!(!FallbackUrlBridge::is_supported());

            let err = bridge.start().unwrap_err();
            assert!(matches!(err, BridgeError::Platform(msg) if msg.contains("only supported on macOS")));

            // Stop should be no-op
            bridge.stop();
            assert!(!bridge.stop_handle().stop());
            assert!(!bridge.is_running());
            assert_eq!(bridge.delivered(), 0);
        }

        #[test]
        fn test_fallback_lookup_is_empty() {
            assert!(FallbackProcessLookup::new().lookup_process(1).is_empty());
        }
    }
}

#[cfg(not(target_os = "macos"))]
pub use fallback::{FallbackProcessLookup as NativeProcessLookup, FallbackUrlBridge as NativeUrlBridge};
