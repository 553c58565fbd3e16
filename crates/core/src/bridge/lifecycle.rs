//! Bridge lifecycle state machine
//!
//! ```text
//! Idle --begin()--> Running --request_stop()--> Stopping --finish()--> Idle
//! ```
//!
//! All transitions are single atomic compare-exchanges, so `request_stop`
//! may race freely with the event loop.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use urlbridge_domain::{BridgeError, Result};

/// Observable phase of a bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BridgeState {
    /// Not started, or the loop has returned.
    Idle = 0,
    /// Event loop running; events are delivered.
    Running = 1,
    /// Stop requested; the loop returns at its next check.
    Stopping = 2,
}

impl BridgeState {
    const fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Running,
            2 => Self::Stopping,
            _ => Self::Idle,
        }
    }
}

/// Shared lifecycle state of one bridge.
#[derive(Debug)]
pub struct BridgeLifecycle {
    state: AtomicU8,
}

impl Default for BridgeLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl BridgeLifecycle {
    /// A lifecycle in [`BridgeState::Idle`].
    #[must_use]
    pub const fn new() -> Self {
        Self { state: AtomicU8::new(BridgeState::Idle as u8) }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> BridgeState {
        BridgeState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Idle -> Running.
    ///
    /// # Errors
    /// [`BridgeError::AlreadyRunning`] unless the bridge is idle.
    pub fn begin(&self) -> Result<()> {
        self.transition(BridgeState::Idle, BridgeState::Running)
            .then_some(())
            .ok_or(BridgeError::AlreadyRunning)
    }

    /// [`begin`](Self::begin), returning a guard that calls
    /// [`finish`](Self::finish) when dropped.
    ///
    /// The guard also runs when the event loop unwinds, so a panicking
    /// callback does not leave the bridge stuck in `Running`.
    ///
    /// # Errors
    /// [`BridgeError::AlreadyRunning`] unless the bridge is idle.
    pub fn begin_guarded(&self) -> Result<RunGuard<'_>> {
        self.begin()?;
        Ok(RunGuard { lifecycle: self })
    }

    /// Running -> Stopping. Returns whether a stop was actually requested.
    #[allow(clippy::must_use_candidate)]
    pub fn request_stop(&self) -> bool {
        let requested = self.transition(BridgeState::Running, BridgeState::Stopping);
        if requested {
            tracing::debug!(phase = "stop", "stop requested");
        } else {
            tracing::trace!(phase = "stop", state = ?self.state(), "stop ignored, bridge not running");
        }
        requested
    }

    /// Back to Idle from any state. Called once the event loop returned.
    pub fn finish(&self) {
        self.state.store(BridgeState::Idle as u8, Ordering::Release);
    }

    /// Events are only delivered while running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state() == BridgeState::Running
    }

    /// True between a successful stop request and `finish()`.
    #[must_use]
    pub fn stop_requested(&self) -> bool {
        self.state() == BridgeState::Stopping
    }

    fn transition(&self, from: BridgeState, to: BridgeState) -> bool {
        self.state
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

/// Returned by [`BridgeLifecycle::begin_guarded`].
#[derive(Debug)]
#[must_use = "dropping the guard finishes the run immediately"]
pub struct RunGuard<'a> {
    lifecycle: &'a BridgeLifecycle,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.lifecycle.finish();
    }
}

/// Cloneable handle that stops a bridge from any thread.
///
/// The stop takes effect once the event loop next checks its state, which
/// is bounded by the configured poll interval.
#[derive(Debug, Clone)]
pub struct StopHandle {
    lifecycle: Arc<BridgeLifecycle>,
}

impl StopHandle {
    /// Handle stopping `lifecycle`.
    #[must_use]
    pub const fn new(lifecycle: Arc<BridgeLifecycle>) -> Self {
        Self { lifecycle }
    }

    /// Request a stop. Returns `false` when the bridge was not running.
    #[allow(clippy::must_use_candidate)]
    pub fn stop(&self) -> bool {
        self.lifecycle.request_stop()
    }

    /// Whether the bridge is currently delivering events.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.lifecycle.is_running()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_cycle() {
        let lifecycle = BridgeLifecycle::new();
        assert_eq!(lifecycle.state(), BridgeState::Idle);

        lifecycle.begin().unwrap();
        assert!(lifecycle.is_running());

        assert!(lifecycle.request_stop());
        assert!(lifecycle.stop_requested());
        assert!(!lifecycle.is_running());

        lifecycle.finish();
        assert_eq!(lifecycle.state(), BridgeState::Idle);

        // Restartable after finishing
        lifecycle.begin().unwrap();
        assert!(lifecycle.is_running());
    }

    #[test]
    fn test_stop_without_start_is_noop() {
        let lifecycle = BridgeLifecycle::new();
        assert!(!lifecycle.request_stop());
        assert_eq!(lifecycle.state(), BridgeState::Idle);

        // A later start is unaffected by the earlier stop
        lifecycle.begin().unwrap();
        assert!(lifecycle.is_running());
    }

    #[test]
    fn test_double_begin_fails() {
        let lifecycle = BridgeLifecycle::new();
        lifecycle.begin().unwrap();
        assert_eq!(lifecycle.begin(), Err(BridgeError::AlreadyRunning));
    }

    #[test]
    fn test_second_stop_is_noop() {
        let lifecycle = BridgeLifecycle::new();
        lifecycle.begin().unwrap();
        assert!(lifecycle.request_stop());
        assert!(!lifecycle.request_stop());
        assert!(lifecycle.stop_requested());
    }

    #[test]
    fn test_run_guard_finishes_on_unwind() {
        let lifecycle = BridgeLifecycle::new();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _running = lifecycle.begin_guarded().unwrap();
            assert!(lifecycle.is_running());
            panic!("callback failed");
        }));

        assert!(result.is_err());
        assert_eq!(lifecycle.state(), BridgeState::Idle);
        // A caught panic does not block the next start
        let _running = lifecycle.begin_guarded().unwrap();
        assert!(lifecycle.is_running());
    }

    #[test]
    fn test_run_guard_rejects_second_begin() {
        let lifecycle = BridgeLifecycle::new();
        let _running = lifecycle.begin_guarded().unwrap();
        assert_eq!(lifecycle.begin_guarded().unwrap_err(), BridgeError::AlreadyRunning);
        assert!(lifecycle.is_running());
    }

    #[test]
    fn test_stop_handle_from_other_thread() {
        let lifecycle = Arc::new(BridgeLifecycle::new());
        lifecycle.begin().unwrap();

        let handle = StopHandle::new(Arc::clone(&lifecycle));
        let stopped = std::thread::spawn(move || handle.stop()).join().unwrap();

        assert!(stopped);
        assert!(lifecycle.stop_requested());
    }
}
