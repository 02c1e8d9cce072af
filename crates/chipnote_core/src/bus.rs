//! Cross-component message bus.
//!
//! # Responsibility
//! - Carry user-facing banner messages from producers (controller) to
//!   consumers (alert banner) without ambient global state.
//!
//! # Invariants
//! - Publishing never fails, even with no subscriber attached.
//! - A lagging subscriber skips to the newest messages instead of erroring.

use log::debug;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

const BUS_CAPACITY: usize = 32;

/// Publish/subscribe channel for banner messages. Clones share one channel.
#[derive(Debug, Clone)]
pub struct MessageBus {
    tx: broadcast::Sender<String>,
}

impl MessageBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BUS_CAPACITY);
        Self { tx }
    }

    /// Publishes one message to every current subscriber.
    pub fn send_message(&self, message: impl Into<String>) {
        let delivered = self.tx.send(message.into()).unwrap_or(0);
        debug!("event=bus_publish module=bus status=ok subscribers={delivered}");
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Banner state fed by a `MessageBus` subscription.
pub struct AlertBanner {
    rx: broadcast::Receiver<String>,
    message: Option<String>,
}

impl AlertBanner {
    pub fn new(bus: &MessageBus) -> Self {
        Self {
            rx: bus.subscribe(),
            message: None,
        }
    }

    /// Currently shown message, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Drains pending messages without waiting; the newest one is shown.
    pub fn poll(&mut self) -> Option<&str> {
        loop {
            match self.rx.try_recv() {
                Ok(message) => self.message = Some(message),
                Err(TryRecvError::Lagged(_)) => continue,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        self.message()
    }

    /// Waits for the next message and shows it.
    ///
    /// Returns `None` once every bus handle is dropped.
    pub async fn next_message(&mut self) -> Option<&str> {
        loop {
            match self.rx.recv().await {
                Ok(message) => {
                    self.message = Some(message);
                    return self.message();
                }
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Hides the banner.
    pub fn close_alert(&mut self) {
        self.message = None;
    }
}
