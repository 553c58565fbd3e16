//! Port interfaces for the URL event bridge
//!
//! These traits define the boundary between the bridge logic and the
//! platform implementations in `urlbridge-infra`.

use urlbridge_domain::{ApplicationInfo, Result};

use super::lifecycle::StopHandle;

/// Source of OS-delivered "open URL" events
pub trait UrlEventSource: Send + Sync {
    /// Register the handler and run the event loop.
    ///
    /// Blocks until [`stop`](Self::stop) is requested. Registration
    /// failure is returned before any event is processed.
    fn start(&mut self) -> Result<()>;

    /// Request the running loop to return.
    ///
    /// No-op when the source is not running.
    fn stop(&self);

    fn is_running(&self) -> bool;

    /// Handle that can stop this source from another thread.
    fn stop_handle(&self) -> StopHandle;

    /// Whether this source can receive events on the current platform.
    fn is_supported() -> bool
    where
        Self: Sized;
}

/// Lookup of running-application metadata by pid
pub trait ProcessLookup: Send + Sync {
    /// Returns an empty [`ApplicationInfo`] when no such process runs.
    fn lookup_process(&self, pid: i32) -> ApplicationInfo;
}
