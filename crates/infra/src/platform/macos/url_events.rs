//! macOS "open URL" Apple Event bridge
//!
//! Installs an Objective-C handler object with `NSAppleEventManager` for the
//! `GURL`/`GURL` event and pumps `NSApplication` events on the main thread
//! until a stop is requested.
//!
//! # Architecture
//! - `define_class!` declares the handler class; its ivars hold the shared
//!   [`UrlDispatcher`]
//! - The event manager is reached through `msg_send!`, keyword arguments
//!   are plain four-char codes
//! - The loop waits at most `poll_interval` per iteration, which bounds the
//!   latency between a stop request and `start()` returning
//!
//! # Memory Management
//! The event manager does not retain its handlers. [`InstalledHandler`]
//! owns the handler object and removes the registration in `Drop` before
//! releasing it, so an unwinding callback cannot leave a dangling handler
//! behind.
//!
//! # Example
//! ```rust,no_run
//! use std::time::Duration;
//!
//! use urlbridge_core::UrlEventSource;
//! use urlbridge_infra::platform::macos::AppleEventUrlBridge;
//!
//! let mut bridge = AppleEventUrlBridge::new(
//!     Box::new(|event| tracing::info!(pid = event.sender_pid, "got URL")),
//!     Duration::from_millis(100),
//! )?;
//! bridge.start()?; // blocks the main thread
//! # Ok::<(), urlbridge_domain::BridgeError>(())
//! ```

use std::sync::{Arc, Once};
use std::time::{Duration, Instant};

use objc2::rc::Retained;
use objc2::runtime::{AnyClass, AnyObject, NSObject, NSObjectProtocol};
use objc2::{define_class, msg_send, sel, AllocAnyThread, DefinedClass, MainThreadMarker};
use objc2_app_kit::{NSApplication, NSEventMask};
use objc2_foundation::{NSDate, NSDefaultRunLoopMode, NSString};
use urlbridge_core::{
    BridgeLifecycle, SlotGuard, StopHandle, UrlCallback, UrlDispatcher, UrlEventSource,
    URL_HANDLER_SLOT,
};
use urlbridge_domain::{Result, UrlEvent};

use super::error_helpers::{main_thread_error, registration_error};

const fn four_char_code(code: &[u8; 4]) -> u32 {
    u32::from_be_bytes(*code)
}

/// `kInternetEventClass`
const K_INTERNET_EVENT_CLASS: u32 = four_char_code(b"GURL");
/// `kAEGetURL`
const K_AE_GET_URL: u32 = four_char_code(b"GURL");
/// `keyDirectObject`
const KEY_DIRECT_OBJECT: u32 = four_char_code(b"----");
/// `keySenderPIDAttr`
const KEY_SENDER_PID_ATTR: u32 = four_char_code(b"spid");

static FINISH_LAUNCHING: Once = Once::new();

struct HandlerIvars {
    dispatcher: Arc<UrlDispatcher>,
}

define_class!(
    // SAFETY:
    // - NSObject has no subclassing requirements.
    // - UrlEventHandler does not implement Drop.
    #[unsafe(super(NSObject))]
    #[name = "URLBridgeGetURLEventHandler"]
    #[ivars = HandlerIvars]
    struct UrlEventHandler;

    impl UrlEventHandler {
        #[unsafe(method(handleGetURLEvent:withReplyEvent:))]
        fn handle_get_url_event(&self, event: &AnyObject, _reply: &AnyObject) {
            let decoded = decode_get_url_event(event);
            let _ = self.ivars().dispatcher.dispatch(decoded);
        }
    }

    unsafe impl NSObjectProtocol for UrlEventHandler {}
);

impl UrlEventHandler {
    fn new(dispatcher: Arc<UrlDispatcher>) -> Retained<Self> {
        let this = Self::alloc().set_ivars(HandlerIvars { dispatcher });
        // SAFETY: plain -[NSObject init] on a freshly allocated instance.
        unsafe { msg_send![super(this), init] }
    }
}

/// Pull the URL text and sender pid out of a `GURL` event descriptor.
///
/// Absent values become `""` and `0`; nothing is validated.
fn decode_get_url_event(event: &AnyObject) -> UrlEvent {
    // SAFETY: `event` is the NSAppleEventDescriptor passed by the event
    // manager. Keywords are FourCharCode (UInt32) arguments and every
    // returned descriptor may be nil.
    unsafe {
        let direct: Option<Retained<AnyObject>> =
            msg_send![event, paramDescriptorForKeyword: KEY_DIRECT_OBJECT];
        let url: Option<Retained<NSString>> = match &direct {
            Some(descriptor) => msg_send![&**descriptor, stringValue],
            None => None,
        };

        let sender: Option<Retained<AnyObject>> =
            msg_send![event, attributeDescriptorForKeyword: KEY_SENDER_PID_ATTR];
        let sender_pid: i32 = match &sender {
            Some(descriptor) => msg_send![&**descriptor, int32Value],
            None => 0,
        };

        UrlEvent::new(url.map(|u| u.to_string()).unwrap_or_default(), sender_pid)
    }
}

fn shared_event_manager() -> Option<Retained<AnyObject>> {
    let class = AnyClass::get(c"NSAppleEventManager")?;
    // SAFETY: +sharedAppleEventManager takes no arguments and returns the
    // process-wide manager.
    unsafe { msg_send![class, sharedAppleEventManager] }
}

/// A live registration with the event manager.
struct InstalledHandler {
    manager: Retained<AnyObject>,
    handler: Retained<UrlEventHandler>,
}

impl InstalledHandler {
    fn install(dispatcher: Arc<UrlDispatcher>) -> Result<Self> {
        let manager = shared_event_manager()
            .ok_or_else(|| registration_error("NSAppleEventManager unavailable"))?;
        let handler = UrlEventHandler::new(dispatcher);

        // SAFETY: the selector is implemented by UrlEventHandler with the
        // (event, reply) signature the manager expects, and `handler`
        // outlives the registration (see Drop).
        unsafe {
            let _: () = msg_send![
                &*manager,
                setEventHandler: &*handler,
                andSelector: sel!(handleGetURLEvent:withReplyEvent:),
                forEventClass: K_INTERNET_EVENT_CLASS,
                andEventID: K_AE_GET_URL
            ];
        }
        tracing::debug!(phase = "register", "get-URL handler installed");

        Ok(Self { manager, handler })
    }
}

impl Drop for InstalledHandler {
    fn drop(&mut self) {
        // CRITICAL ORDER: unregister before the handler object is released
        // SAFETY: removing a handler for a class/id pair is always valid.
        unsafe {
            let _: () = msg_send![
                &*self.manager,
                removeEventHandlerForEventClass: K_INTERNET_EVENT_CLASS,
                andEventID: K_AE_GET_URL
            ];
        }
        tracing::debug!(
            phase = "unregister",
            handler = ?Retained::as_ptr(&self.handler),
            "get-URL handler removed"
        );
    }
}

/// macOS URL event bridge
///
/// Only one instance may exist per process; [`new`](Self::new) fails with
/// `AlreadyClaimed` otherwise.
pub struct AppleEventUrlBridge {
    dispatcher: Arc<UrlDispatcher>,
    lifecycle: Arc<BridgeLifecycle>,
    poll_interval: Duration,
    _slot: SlotGuard,
}

impl std::fmt::Debug for AppleEventUrlBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppleEventUrlBridge")
            .field("state", &self.lifecycle.state())
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}

impl AppleEventUrlBridge {
    /// Create the bridge and claim the process-wide handler slot.
    ///
    /// # Errors
    /// `AlreadyClaimed` while another bridge exists in this process.
    pub fn new(callback: UrlCallback, poll_interval: Duration) -> Result<Self> {
        let slot = URL_HANDLER_SLOT.claim()?;
        let lifecycle = Arc::new(BridgeLifecycle::new());
        let dispatcher = Arc::new(UrlDispatcher::new(callback, Arc::clone(&lifecycle)));
        Ok(Self { dispatcher, lifecycle, poll_interval, _slot: slot })
    }

    /// Number of URL events delivered to the callback.
    pub fn delivered(&self) -> u64 {
        self.dispatcher.delivered()
    }

    #[allow(unused_unsafe)]
    fn run_event_loop(&self, mtm: MainThreadMarker) {
        let app = NSApplication::sharedApplication(mtm);

        // Launch-time URL events are delivered from finishLaunching, so it
        // must run after the handler is installed.
        FINISH_LAUNCHING.call_once(|| {
            // SAFETY: called once, on the main thread.
            unsafe { app.finishLaunching() };
        });

        while !self.lifecycle.stop_requested() {
            // SAFETY: main-thread AppKit event pumping; NSDefaultRunLoopMode
            // is an immutable framework constant.
            unsafe {
                let deadline =
                    NSDate::dateWithTimeIntervalSinceNow(self.poll_interval.as_secs_f64());
                let event = app.nextEventMatchingMask_untilDate_inMode_dequeue(
                    NSEventMask::Any,
                    Some(&deadline),
                    NSDefaultRunLoopMode,
                    true,
                );
                if let Some(event) = event {
                    app.sendEvent(&event);
                }
            }
        }
    }
}

impl UrlEventSource for AppleEventUrlBridge {
    fn start(&mut self) -> Result<()> {
        let mtm = MainThreadMarker::new()
            .ok_or_else(|| main_thread_error("AppleEventUrlBridge::start"))?;
        let lifecycle = Arc::clone(&self.lifecycle);
        // Declared before `installed`, so the handler is removed first.
        let running = lifecycle.begin_guarded()?;

        let started = Instant::now();
        let installed = InstalledHandler::install(Arc::clone(&self.dispatcher)).inspect_err(|err| {
            tracing::error!(error = %err, "URL event handler registration failed");
        })?;

        let poll_interval_ms = u64::try_from(self.poll_interval.as_millis()).unwrap_or(u64::MAX);
        tracing::info!(poll_interval_ms, "URL event bridge started");

        self.run_event_loop(mtm);

        drop(installed);
        drop(running);

        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        tracing::info!(duration_ms, delivered = self.delivered(), "URL event bridge stopped");
        Ok(())
    }

    fn stop(&self) {
        self.lifecycle.request_stop();
    }

    fn is_running(&self) -> bool {
        self.lifecycle.is_running()
    }

    fn stop_handle(&self) -> StopHandle {
        StopHandle::new(Arc::clone(&self.lifecycle))
    }

    fn is_supported() -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use urlbridge_domain::BridgeError;

    use super::*;

    #[test]
    fn test_four_char_codes() {
        assert_eq!(K_INTERNET_EVENT_CLASS, 0x4755_524C);
        assert_eq!(K_AE_GET_URL, K_INTERNET_EVENT_CLASS);
        assert_eq!(KEY_DIRECT_OBJECT, 0x2D2D_2D2D);
        assert_eq!(KEY_SENDER_PID_ATTR, 0x7370_6964);
    }

    #[test]
    fn test_is_supported() {
        assert!(AppleEventUrlBridge::is_supported());
    }

    // One test owns the global slot; parallel tests would race for it.
    #[test]
    fn test_bridge_lifecycle_off_main_thread() {
        let mut bridge =
            AppleEventUrlBridge::new(Box::new(|_| {}), Duration::from_millis(10)).unwrap();

        // Only one bridge per process
        let second = AppleEventUrlBridge::new(Box::new(|_| {}), Duration::from_millis(10));
        assert_eq!(second.unwrap_err(), BridgeError::AlreadyClaimed);

        // Stop without start is a no-op
        bridge.stop();
        assert!(!bridge.stop_handle().stop());
        assert!(!bridge.is_running());

        // Test threads are never the main thread
        let err = bridge.start().unwrap_err();
        assert!(matches!(err, BridgeError::Platform(msg) if msg.contains("main thread")));
        assert!(!bridge.is_running());

        drop(bridge);
        assert!(!URL_HANDLER_SLOT.is_claimed());
    }
}
