//! URL event bridge building blocks
//!
//! An adapter owns one [`UrlDispatcher`](dispatcher::UrlDispatcher) and one
//! [`BridgeLifecycle`](lifecycle::BridgeLifecycle), holds a
//! [`SlotGuard`](slot::SlotGuard) for as long as it exists, and implements
//! [`UrlEventSource`](ports::UrlEventSource).

pub mod dispatcher;
pub mod lifecycle;
pub mod ports;
pub mod slot;
