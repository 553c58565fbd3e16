//! Integration tests for the bridge building blocks
//!
//! Drives a scripted `UrlEventSource` through start/stop to check the
//! delivery guarantees every platform adapter inherits.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use urlbridge_core::{
    url_channel, BridgeLifecycle, StopHandle, UrlCallback, UrlDispatcher, UrlEventSource,
};
use urlbridge_domain::{BridgeError, Result, UrlEvent};

/// Replays queued events from its "event loop", then waits for a stop.
struct ScriptedSource {
    dispatcher: Arc<UrlDispatcher>,
    lifecycle: Arc<BridgeLifecycle>,
    script: Mutex<Vec<UrlEvent>>,
}

impl ScriptedSource {
    fn new(callback: UrlCallback, script: Vec<UrlEvent>) -> Self {
        let lifecycle = Arc::new(BridgeLifecycle::new());
        let dispatcher = Arc::new(UrlDispatcher::new(callback, Arc::clone(&lifecycle)));
        Self { dispatcher, lifecycle, script: Mutex::new(script) }
    }
}

impl UrlEventSource for ScriptedSource {
    fn start(&mut self) -> Result<()> {
        let lifecycle = Arc::clone(&self.lifecycle);
        let _running = lifecycle.begin_guarded()?;
        let events: Vec<UrlEvent> = self.script.lock().drain(..).collect();
        for event in events {
            let _ = self.dispatcher.dispatch(event);
        }
        while !self.lifecycle.stop_requested() {
            std::thread::sleep(Duration::from_millis(5));
        }
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

#[test]
fn test_each_event_delivered_once_in_order() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let script = vec![
        UrlEvent::new("https://a.example", 10),
        UrlEvent::new("https://a.example", 10),
        UrlEvent::new("mailto:someone@example.com", 11),
    ];
    let mut source = ScriptedSource::new(Box::new(move |e| sink.lock().push(e)), script.clone());

    let stop = source.stop_handle();
    let stopper = std::thread::spawn(move || {
        while !stop.is_running() {
            std::thread::sleep(Duration::from_millis(1));
        }
        std::thread::sleep(Duration::from_millis(20));
        stop.stop()
    });

    source.start().unwrap();
    assert!(stopper.join().unwrap());

    // No deduplication: the repeated event arrives twice
    assert_eq!(*seen.lock(), script);
    assert!(!source.is_running());
}

#[test]
fn test_stop_before_start_does_nothing() {
    let source = ScriptedSource::new(Box::new(|_| {}), Vec::new());
    source.stop();
    assert!(!source.stop_handle().stop());
    assert!(!source.is_running());
}

#[test]
fn test_start_while_running_fails() {
    let lifecycle = BridgeLifecycle::new();
    lifecycle.begin().unwrap();
    assert_eq!(lifecycle.begin(), Err(BridgeError::AlreadyRunning));
}

#[test]
fn test_channel_handoff_from_dispatch_context() {
    let (sender, mut receiver) = url_channel();
    let mut source =
        ScriptedSource::new(sender.into_callback(), vec![UrlEvent::new("https://b.example", 5)]);
    let stop = source.stop_handle();

    let worker = std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap();
        let event = runtime.block_on(receiver.wait_for_url(Duration::from_secs(5)));
        while !stop.stop() {
            std::thread::sleep(Duration::from_millis(1));
        }
        event
    });

    source.start().unwrap();
    let event = worker.join().unwrap().unwrap();
    assert_eq!(event, UrlEvent::new("https://b.example", 5));
}

#[test]
fn test_restart_after_callback_panic() {
    let mut source = ScriptedSource::new(
        Box::new(|event| assert_ne!(event.url, "myapp://boom", "callback failed")),
        vec![UrlEvent::new("myapp://boom", 3)],
    );

    let unwound = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| source.start()));
    assert!(unwound.is_err());
    assert!(!source.is_running());

    let stop = source.stop_handle();
    let stopper = std::thread::spawn(move || {
        while !stop.stop() {
            std::thread::sleep(Duration::from_millis(1));
        }
    });
    assert_eq!(source.start(), Ok(()));
    stopper.join().unwrap();
}
