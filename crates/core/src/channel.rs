//! Hand-off of URL events from the dispatch context to a worker
//!
//! The bridge callback must not block. [`UrlEventSender::into_callback`]
//! turns the sending half into a callback whose only work is a
//! non-blocking send; the worker awaits [`UrlEventReceiver::wait_for_url`].
//!
//! ```rust,ignore
//! let (sender, mut receiver) = url_channel();
//! let mut bridge = AppleEventUrlBridge::new(sender.into_callback(), poll)?;
//! let stop = bridge.stop_handle();
//! std::thread::spawn(move || {
//!     let rt = tokio::runtime::Builder::new_current_thread().enable_time().build()?;
//!     let event = rt.block_on(receiver.wait_for_url(Duration::from_secs(4)));
//!     stop.stop();
//!     event
//! });
//! bridge.start()?;
//! ```

use std::time::Duration;

use tokio::sync::mpsc;
use urlbridge_domain::constants::WAIT_TIMEOUT_MESSAGE;
use urlbridge_domain::{BridgeError, Result, UrlEvent};

use crate::bridge::dispatcher::UrlCallback;

/// Create a connected sender/receiver pair.
#[must_use]
pub fn url_channel() -> (UrlEventSender, UrlEventReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (UrlEventSender { tx }, UrlEventReceiver { rx })
}

/// Sending half; cheap to clone.
#[derive(Debug, Clone)]
pub struct UrlEventSender {
    tx: mpsc::UnboundedSender<UrlEvent>,
}

impl UrlEventSender {
    /// Queue an event without blocking.
    ///
    /// # Errors
    /// [`BridgeError::ChannelClosed`] once the receiver is gone.
    pub fn send(&self, event: UrlEvent) -> Result<()> {
        self.tx.send(event).map_err(|_| BridgeError::ChannelClosed)
    }

    /// Wrap this sender as a bridge callback.
    ///
    /// Events sent after the receiver is dropped are logged and discarded.
    #[must_use]
    pub fn into_callback(self) -> UrlCallback {
        Box::new(move |event| {
            let sender_pid = event.sender_pid;
            if let Err(err) = self.send(event) {
                tracing::warn!(error = %err, sender_pid, "URL event discarded");
            }
        })
    }
}

/// Receiving half, owned by the worker.
#[derive(Debug)]
pub struct UrlEventReceiver {
    rx: mpsc::UnboundedReceiver<UrlEvent>,
}

impl UrlEventReceiver {
    /// Next event, or `None` once every sender is dropped.
    pub async fn recv(&mut self) -> Option<UrlEvent> {
        self.rx.recv().await
    }

    /// Wait at most `timeout` for the next event.
    ///
    /// # Errors
    /// - [`BridgeError::Timeout`] when nothing arrives in time
    /// - [`BridgeError::ChannelClosed`] when every sender is dropped
    pub async fn wait_for_url(&mut self, timeout: Duration) -> Result<UrlEvent> {
        match tokio::time::timeout(timeout, self.rx.recv()).await {
            Ok(Some(event)) => Ok(event),
            Ok(None) => Err(BridgeError::ChannelClosed),
            Err(_) => {
                let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
                tracing::debug!(timeout_ms, "wait_for_url timed out");
                Err(BridgeError::Timeout(WAIT_TIMEOUT_MESSAGE.to_string()))
            }
        }
    }

    /// Non-async variant of [`recv`](Self::recv) for plain threads.
    pub fn try_recv(&mut self) -> Option<UrlEvent> {
        self.rx.try_recv().ok()
    }
}
