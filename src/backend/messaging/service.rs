//! Message Service
//!
//! Persist-then-publish. A message reaches the Notification Hub only after
//! the store has accepted it, so a subscriber can always read back what it
//! was pushed. Timestamps are assigned by the store as part of the write.

use std::sync::Arc;

use uuid::Uuid;

use super::long_poll::PersistSignal;
use crate::backend::realtime::Notifier;
use crate::backend::store::{MessageStore, NewMessage, StoreError, StoreResult};
use crate::shared::messaging::{Message, SendMessageRequest};
use crate::shared::SharedError;

/// Errors from sending a message
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error(transparent)]
    Invalid(#[from] SharedError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Clone)]
pub struct MessageService {
    store: Arc<dyn MessageStore>,
    notifier: Arc<dyn Notifier>,
    signal: PersistSignal,
}

impl MessageService {
    pub fn new(
        store: Arc<dyn MessageStore>,
        notifier: Arc<dyn Notifier>,
        signal: PersistSignal,
    ) -> Self {
        Self {
            store,
            notifier,
            signal,
        }
    }

    /// Validate, persist and fan out a new message.
    ///
    /// The id is taken from the request when present; the timestamp never is.
    pub async fn send(&self, request: SendMessageRequest) -> Result<Message, SendError> {
        request.validate()?;

        let message = NewMessage {
            id: request.id.unwrap_or_else(Uuid::new_v4),
            sender: request.sender,
            receiver: request.receiver,
            text: request.text,
        };

        let saved = self.store.append(message).await?;
        tracing::info!(
            "[MessageService] Persisted message {} from {} to {}",
            saved.id,
            saved.sender,
            saved.receiver
        );

        self.signal.notify();
        self.notifier.publish(&saved);
        Ok(saved)
    }

    pub async fn conversation(
        &self,
        user1: Uuid,
        user2: Uuid,
        include_deleted: bool,
    ) -> StoreResult<Vec<Message>> {
        self.store.conversation(user1, user2, include_deleted).await
    }

    pub async fn get(&self, id: Uuid) -> StoreResult<Message> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(StoreError::not_found("message"))
    }

    pub async fn by_sender(&self, sender: Uuid) -> StoreResult<Vec<Message>> {
        self.store.by_sender(sender).await
    }

    pub async fn by_receiver(&self, receiver: Uuid) -> StoreResult<Vec<Message>> {
        self.store.by_receiver(receiver).await
    }

    pub async fn soft_delete(&self, id: Uuid) -> StoreResult<Message> {
        let deleted = self
            .store
            .soft_delete(id)
            .await?
            .ok_or(StoreError::not_found("message"))?;
        tracing::info!("[MessageService] Soft-deleted message {}", id);
        Ok(deleted)
    }

    /// Administrative hard delete
    pub async fn purge(&self, id: Uuid) -> StoreResult<()> {
        if !self.store.purge(id).await? {
            return Err(StoreError::not_found("message"));
        }
        tracing::warn!("[MessageService] Purged message {}", id);
        Ok(())
    }
}
