//! # `URLBridge` Core
//!
//! Platform-free bridge logic.
//!
//! This crate contains:
//! - Port interfaces implemented by the platform adapters
//! - The lifecycle state machine and stop handle
//! - The dispatcher that delivers URL events to the injected callback
//! - The process-wide handler slot
//! - Channel hand-off and application criteria matching
//!
//! ## Architecture Principles
//! - Only depends on `urlbridge-domain`
//! - No Objective-C or OS calls
//! - Everything here is testable on any host

pub mod bridge;
pub mod channel;
pub mod matching;

pub use bridge::dispatcher::{UrlCallback, UrlDispatcher};
pub use bridge::lifecycle::{BridgeLifecycle, BridgeState, RunGuard, StopHandle};
pub use bridge::ports::{ProcessLookup, UrlEventSource};
pub use bridge::slot::{HandlerSlot, SlotGuard, URL_HANDLER_SLOT};
pub use channel::{url_channel, UrlEventReceiver, UrlEventSender};
pub use matching::AppCriteria;
