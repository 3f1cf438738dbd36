//! Push Channel Frames
//!
//! Text frames exchanged over the WebSocket push channel. Message deliveries
//! are sent as a bare JSON array of `Message` (always one element); every
//! other server frame is a tagged `ServerFrame`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Frames a client may send
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    /// Start receiving deliveries for a user topic
    Subscribe { user_id: Uuid },
    /// Stop receiving deliveries for a user topic
    Unsubscribe { user_id: Uuid },
    /// Persist and deliver a new message
    Send {
        sender: Uuid,
        receiver: Uuid,
        text: String,
    },
}

/// Control frames the server sends
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerFrame {
    Subscribed { user_id: Uuid },
    Unsubscribed { user_id: Uuid },
    Error { message: String },
}
