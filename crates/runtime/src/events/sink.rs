//! Outbound notification channel.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// MIME type attached to JSON notifications.
pub const JSON_MIME_TYPE: &str = "application/json";

/// One message for consumers outside the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Fixed event-type identifier consumers filter on.
    pub action: String,
    pub mime_type: String,
    /// Serialized payload.
    pub data: String,
}

impl Notification {
    /// Serializes `payload` as JSON under `action`.
    pub fn json<T: Serialize>(action: &str, payload: &T) -> serde_json::Result<Self> {
        Ok(Self {
            action: action.to_owned(),
            mime_type: JSON_MIME_TYPE.to_owned(),
            data: serde_json::to_string(payload)?,
        })
    }
}

/// Destination for notifications. Sending is fire-and-forget.
pub trait NotificationSink: Send + Sync {
    fn send(&self, notification: Notification);
}

/// In-process fan-out of notifications over a broadcast channel.
///
/// Lagging receivers lose the oldest notifications once `capacity` is
/// exceeded; sending with no receivers is not an error.
pub struct ChannelSink {
    sender: broadcast::Sender<Notification>,
}

impl ChannelSink {
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sender: broadcast::channel(capacity.max(1)).0,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }
}

impl NotificationSink for ChannelSink {
    fn send(&self, notification: Notification) {
        if self.sender.send(notification).is_err() {
            // No subscribers - this is normal, not an error
            tracing::trace!(target: "runtime::events", "No subscribers for notification");
        }
    }
}

impl Clone for ChannelSink {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl Default for ChannelSink {
    fn default() -> Self {
        Self::new()
    }
}
