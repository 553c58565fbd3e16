//! Delivery of decoded URL events to the host callback

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use urlbridge_domain::UrlEvent;

use super::lifecycle::BridgeLifecycle;

/// Host callback invoked once per URL event.
///
/// Runs on the OS event-dispatch context and must return promptly; hand
/// long work to a worker (see [`crate::channel`]). Panics are not caught.
pub type UrlCallback = Box<dyn Fn(UrlEvent) + Send + Sync>;

/// Delivers decoded events to the host callback one at a time.
pub struct UrlDispatcher {
    callback: UrlCallback,
    lifecycle: Arc<BridgeLifecycle>,
    /// Held for the duration of each callback so deliveries never overlap.
    gate: Mutex<()>,
    delivered: AtomicU64,
}

impl std::fmt::Debug for UrlDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UrlDispatcher")
            .field("state", &self.lifecycle.state())
            .field("delivered", &self.delivered())
            .finish_non_exhaustive()
    }
}

impl UrlDispatcher {
    /// Wrap `callback`; events are delivered only while `lifecycle` is running.
    #[must_use]
    pub fn new(callback: UrlCallback, lifecycle: Arc<BridgeLifecycle>) -> Self {
        Self { callback, lifecycle, gate: Mutex::new(()), delivered: AtomicU64::new(0) }
    }

    /// Deliver `event` to the callback if the bridge is running.
    ///
    /// Returns whether the callback was invoked.
    #[must_use = "false means the event was dropped"]
    pub fn dispatch(&self, event: UrlEvent) -> bool {
        // Checked under the gate so a stop that lands while another
        // delivery holds it is observed before this callback runs.
        let gate = self.gate.lock();
        if !self.lifecycle.is_running() {
            tracing::debug!(
                sender_pid = event.sender_pid,
                state = ?self.lifecycle.state(),
                "URL event dropped, bridge not running"
            );
            drop(gate);
            return false;
        }

        tracing::debug!(sender_pid = event.sender_pid, url_len = event.url.len(), "URL event received");
        tracing::trace!(url = %event.url, "URL event payload");

        (self.callback)(event);

        self.delivered.fetch_add(1, Ordering::Relaxed);
        drop(gate);
        true
    }

    /// Number of events handed to the callback so far.
    #[must_use]
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    /// Lifecycle shared with the owning bridge.
    #[must_use]
    pub const fn lifecycle(&self) -> &Arc<BridgeLifecycle> {
        &self.lifecycle
    }
}
