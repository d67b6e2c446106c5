//! Notification sinks.
//!
//! The provider announces side-channel events (currently only
//! [`SCHEMA_UPDATE_EVENT`]) through a sink injected at construction. What
//! listens on the other end, and for how long, is up to the caller.

use tokio::sync::broadcast;
use tracing::{debug, info};

/// Emitted after a create or update on the schema resource completes.
pub const SCHEMA_UPDATE_EVENT: &str = "schema_update";

/// Receives named events from the provider.
///
/// `notify` is called inline, so implementations should return quickly.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, event: &str);
}

/// Drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl NotificationSink for NoopNotifier {
    fn notify(&self, event: &str) {
        debug!("Dropping notification: {}", event);
    }
}

/// Fans events out to any number of subscribers over a tokio broadcast
/// channel. Events sent while nobody is subscribed are lost.
#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    sender: broadcast::Sender<String>,
}

impl BroadcastNotifier {
    /// Creates a notifier whose subscribers may lag by up to `capacity`
    /// events before dropping the oldest.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Returns a receiver for events sent from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastNotifier {
    fn default() -> Self {
        Self::new(16)
    }
}

impl NotificationSink for BroadcastNotifier {
    fn notify(&self, event: &str) {
        match self.sender.send(event.to_string()) {
            Ok(receivers) => info!("Notified {} subscriber(s): {}", receivers, event),
            Err(_) => debug!("No subscribers for notification: {}", event),
        }
    }
}
