//! Contact Request Data Structure
//!
//! Represents a request from one user to become a contact of another.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::SharedError;

/// Status of a contact request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContactRequestStatus {
    /// Request is waiting for the recipient
    Pending,
    /// Request was accepted and replaced by two contact edges
    Accepted,
    /// Request was rejected
    Rejected,
}

impl Default for ContactRequestStatus {
    fn default() -> Self {
        ContactRequestStatus::Pending
    }
}

impl ContactRequestStatus {
    /// Storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactRequestStatus::Pending => "PENDING",
            ContactRequestStatus::Accepted => "ACCEPTED",
            ContactRequestStatus::Rejected => "REJECTED",
        }
    }

    /// Human-readable label used in contact listings
    pub fn display_string(&self) -> &'static str {
        match self {
            ContactRequestStatus::Pending => "Pending",
            ContactRequestStatus::Accepted => "Accepted",
            ContactRequestStatus::Rejected => "Rejected",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "PENDING" => Some(ContactRequestStatus::Pending),
            "ACCEPTED" => Some(ContactRequestStatus::Accepted),
            "REJECTED" => Some(ContactRequestStatus::Rejected),
            _ => None,
        }
    }
}

/// Represents a contact request
///
/// `(requester, recipient)` is the natural key: a requester has at most one
/// outstanding request per recipient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactRequest {
    /// User who sent the request
    pub requester: Uuid,
    /// User who received the request
    pub recipient: Uuid,
    /// Current status of the request
    #[serde(default)]
    pub status: ContactRequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContactRequest {
    /// Create a new pending request
    pub fn pending(requester: Uuid, recipient: Uuid) -> Self {
        let now = Utc::now();
        Self {
            requester,
            recipient,
            status: ContactRequestStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == ContactRequestStatus::Pending
    }
}

/// Body of `POST contacts/sendRequest`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendContactRequest {
    pub requester: Uuid,
    pub recipient: Uuid,
}

impl SendContactRequest {
    pub fn validate(&self) -> Result<(), SharedError> {
        if self.requester == self.recipient {
            return Err(SharedError::validation(
                "recipient",
                "cannot send a contact request to yourself",
            ));
        }
        Ok(())
    }
}
