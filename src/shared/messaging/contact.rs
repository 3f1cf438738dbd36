//! Contact Data Structure
//!
//! A mutual contact relationship is stored as two directed edges. `ContactView`
//! is the read-time projection returned by contact listings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::contact_request::{ContactRequest, ContactRequestStatus};
use super::user::UserProfile;

/// One directed contact edge (initiator -> target)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Contact {
    /// Store-assigned identity
    pub id: i64,
    /// The user who owns this edge
    pub initiator: Uuid,
    /// The counterpart user
    pub target: Uuid,
    /// When the edge was created
    pub created_at: DateTime<Utc>,
}

/// A contact or pending outgoing request joined with the counterpart's profile
///
/// Never persisted. Profile fields are `None` when the counterpart has no
/// profile record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactView {
    pub target: Uuid,
    pub created_at: DateTime<Utc>,
    pub target_username: Option<String>,
    pub target_display_name: Option<String>,
    pub target_photo_uri: Option<String>,
    pub target_email: Option<String>,
    /// "Accepted" or "Pending"
    pub status: String,
}

impl ContactView {
    /// View of an established contact edge
    pub fn accepted(contact: &Contact, profile: Option<&UserProfile>) -> Self {
        Self::build(
            contact.target,
            contact.created_at,
            profile,
            ContactRequestStatus::Accepted,
        )
    }

    /// View of an outgoing request, labelled with the request's own status
    pub fn pending(request: &ContactRequest, profile: Option<&UserProfile>) -> Self {
        Self::build(request.recipient, request.created_at, profile, request.status)
    }

    fn build(
        target: Uuid,
        created_at: DateTime<Utc>,
        profile: Option<&UserProfile>,
        status: ContactRequestStatus,
    ) -> Self {
        Self {
            target,
            created_at,
            target_username: profile.map(|p| p.username.clone()),
            target_display_name: profile.and_then(|p| p.display_name.clone()),
            target_photo_uri: profile.and_then(|p| p.photo_uri.clone()),
            target_email: profile.map(|p| p.email.clone()),
            status: status.display_string().to_string(),
        }
    }
}
