//! Process-wide handler slot
//!
//! The OS keeps exactly one "get URL" handler per process, so at most one
//! bridge may exist at a time. A bridge claims [`URL_HANDLER_SLOT`] when it
//! is built and releases it when dropped.

use std::sync::atomic::{AtomicBool, Ordering};

use urlbridge_domain::{BridgeError, Result};

/// The slot every platform bridge claims.
pub static URL_HANDLER_SLOT: HandlerSlot = HandlerSlot::new();

/// Single-owner claim on the process-wide handler registration.
#[derive(Debug)]
pub struct HandlerSlot {
    claimed: AtomicBool,
}

impl Default for HandlerSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl HandlerSlot {
    /// An unclaimed slot.
    #[must_use]
    pub const fn new() -> Self {
        Self { claimed: AtomicBool::new(false) }
    }

    /// Claim the slot.
    ///
    /// # Errors
    /// [`BridgeError::AlreadyClaimed`] while another guard is alive.
    pub fn claim(&'static self) -> Result<SlotGuard> {
        if self.claimed.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_err() {
            tracing::warn!("handler_slot.already_claimed");
            return Err(BridgeError::AlreadyClaimed);
        }
        tracing::debug!("handler_slot.claimed");
        Ok(SlotGuard { slot: self })
    }

    /// Whether a [`SlotGuard`] for this slot is alive.
    #[must_use]
    pub fn is_claimed(&self) -> bool {
        self.claimed.load(Ordering::Acquire)
    }
}

/// Releases the slot on drop.
#[derive(Debug)]
pub struct SlotGuard {
    slot: &'static HandlerSlot,
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        self.slot.claimed.store(false, Ordering::Release);
        tracing::debug!("handler_slot.released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static TEST_SLOT: HandlerSlot = HandlerSlot::new();

    #[test]
    fn test_single_claim() {
        let first = TEST_SLOT.claim();
        assert!(first.is_ok());
        assert!(TEST_SLOT.is_claimed());

        let second = TEST_SLOT.claim();
        assert_eq!(second.unwrap_err(), BridgeError::AlreadyClaimed);

        drop(first);
        assert!(!TEST_SLOT.is_claimed());

        let third = TEST_SLOT.claim();
        assert!(third.is_ok());
    }
}
