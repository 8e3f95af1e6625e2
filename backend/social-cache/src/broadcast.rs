//! Notification stream seam.
//!
//! Write paths publish events here; the SSE transport (outside this crate)
//! subscribes one receiver per connected client. The hub owns a broadcast
//! channel, so subscriber registration and teardown are handled by channel
//! handles instead of a shared mutable client set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationKind {
    CreatePost,
    DeletePost,
    CreateComment,
    DeleteComment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationEvent {
    pub kind: NotificationKind,
    pub actor_id: i64,
    pub post_id: i64,
    pub created_at: DateTime<Utc>,
}

impl NotificationEvent {
    pub fn new(kind: NotificationKind, actor_id: i64, post_id: i64) -> Self {
        Self {
            kind,
            actor_id,
            post_id,
            created_at: Utc::now(),
        }
    }
}

pub struct NotificationHub {
    tx: broadcast::Sender<NotificationEvent>,
}

impl NotificationHub {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Register a subscriber; dropping the receiver unregisters it.
    pub fn subscribe(&self) -> broadcast::Receiver<NotificationEvent> {
        self.tx.subscribe()
    }

    /// Publish an event to every live subscriber. Returns how many
    /// subscribers received it; zero listeners is not an error.
    pub fn notify(&self, event: NotificationEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new(256)
    }
}
