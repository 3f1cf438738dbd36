//! Direct Message Data Structure
//!
//! Represents one message between a sender and a receiver.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::SharedError;

/// Represents a persisted direct message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Unique message ID
    pub id: Uuid,
    /// User who sent the message
    pub sender: Uuid,
    /// User the message is addressed to
    pub receiver: Uuid,
    /// Message body
    pub text: String,
    /// Server-assigned creation time in milliseconds since the Unix epoch
    pub created_at: i64,
    /// Soft-delete flag; deleted messages keep their row
    #[serde(default)]
    pub is_deleted: bool,
}

impl Message {
    /// Whether this message belongs to the conversation between `user1` and `user2`,
    /// in either direction.
    pub fn is_between(&self, user1: Uuid, user2: Uuid) -> bool {
        (self.sender == user1 && self.receiver == user2)
            || (self.sender == user2 && self.receiver == user1)
    }
}

/// Request to send a message
///
/// The creation timestamp is never taken from the client; `id` may be supplied
/// so a client can reconcile its optimistic local echo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub sender: Uuid,
    pub receiver: Uuid,
    pub text: String,
}

impl SendMessageRequest {
    pub fn validate(&self) -> Result<(), SharedError> {
        if self.text.trim().is_empty() {
            return Err(SharedError::validation("text", "Message text cannot be empty"));
        }
        Ok(())
    }
}

/// Query parameters for reading a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationParams {
    pub user1: Uuid,
    pub user2: Uuid,
    #[serde(default)]
    pub include_deleted: bool,
}

/// Query parameters for a long poll
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollParams {
    pub user1: Uuid,
    pub user2: Uuid,
    /// Exclusive watermark in epoch milliseconds
    pub since: i64,
}
