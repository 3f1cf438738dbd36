//! Notification Hub
//!
//! Per-user topics backed by `tokio::sync::broadcast`. A topic is created on
//! first subscription and pruned by the periodic cleanup task once its last
//! receiver is gone. Publishing to a topic with no subscribers is a no-op.
//!
//! Every delivery is a one-element `Vec<Message>` so push clients can treat
//! SSE events, WebSocket frames and poll responses the same way.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::broadcast;
use uuid::Uuid;

use crate::shared::messaging::Message;

/// One delivery on a user topic
pub type TopicPayload = Vec<Message>;

/// Fan-out of persisted messages
///
/// Callers must only publish messages that are already durably stored.
pub trait Notifier: Send + Sync {
    fn publish(&self, message: &Message);
}

/// Topic senders and the drained flag, guarded together so no topic can be
/// created once `drain` has run.
#[derive(Default)]
struct Topics {
    senders: HashMap<Uuid, broadcast::Sender<TopicPayload>>,
    closed: bool,
}

#[derive(Clone)]
pub struct NotificationHub {
    topics: Arc<Mutex<Topics>>,
    capacity: usize,
}

impl NotificationHub {
    pub fn new(capacity: usize) -> Self {
        Self {
            topics: Arc::new(Mutex::new(Topics::default())),
            capacity: capacity.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Topics> {
        // the map stays consistent even if a holder panicked
        self.topics.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Subscribe to a user topic, creating it if needed.
    ///
    /// Returns `None` once the hub has been drained.
    pub fn subscribe(&self, user_id: Uuid) -> Option<broadcast::Receiver<TopicPayload>> {
        let mut topics = self.lock();
        if topics.closed {
            return None;
        }
        let sender = topics
            .senders
            .entry(user_id)
            .or_insert_with(|| broadcast::channel(self.capacity).0);
        Some(sender.subscribe())
    }

    /// Send a payload to one topic. Returns the number of receivers reached.
    pub fn publish_to(&self, user_id: Uuid, payload: TopicPayload) -> usize {
        let topics = self.lock();
        match topics.senders.get(&user_id) {
            Some(sender) => sender.send(payload).unwrap_or(0),
            None => 0,
        }
    }

    /// Drop topics that have no receivers left
    pub fn cleanup_inactive_topics(&self) -> usize {
        let mut topics = self.lock();
        let before = topics.senders.len();
        topics.senders.retain(|_, sender| sender.receiver_count() > 0);
        before - topics.senders.len()
    }

    pub fn subscriber_count(&self, user_id: Uuid) -> usize {
        self.lock()
            .senders
            .get(&user_id)
            .map(|sender| sender.receiver_count())
            .unwrap_or(0)
    }

    pub fn topic_count(&self) -> usize {
        self.lock().senders.len()
    }

    /// Close every topic and refuse new subscriptions.
    ///
    /// Dropping the senders ends all SSE streams and push forwarders, which
    /// lets graceful shutdown finish.
    pub fn drain(&self) {
        let drained = {
            let mut topics = self.lock();
            topics.closed = true;
            let count = topics.senders.len();
            topics.senders.clear();
            count
        };
        tracing::info!("[Hub] Drained {} topics", drained);
    }
}

impl Notifier for NotificationHub {
    fn publish(&self, message: &Message) {
        let reached = self.publish_to(message.receiver, vec![message.clone()]);
        let reached = if message.sender != message.receiver {
            reached + self.publish_to(message.sender, vec![message.clone()])
        } else {
            reached
        };
        tracing::debug!(
            "[Hub] Published message {} to {} receivers",
            message.id,
            reached
        );
    }
}
