//! User Profile
//!
//! Profiles are owned by an external user service; this crate only reads
//! them to enrich contact listings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::SharedError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub display_name: Option<String>,
    pub photo_uri: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    /// Create a profile with a fresh id and no optional fields
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            email: email.into(),
            display_name: None,
            photo_uri: None,
            status: "offline".to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }
}

/// Request to register a user profile; the id is always server-assigned
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub photo_uri: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl CreateUserRequest {
    pub fn validate(&self) -> Result<(), SharedError> {
        if self.username.trim().is_empty() {
            return Err(SharedError::validation("username", "username cannot be empty"));
        }
        if !self.email.contains('@') {
            return Err(SharedError::validation("email", "email address is not valid"));
        }
        Ok(())
    }

    pub fn into_profile(self) -> UserProfile {
        let mut profile = UserProfile::new(self.username.trim(), self.email.trim());
        profile.display_name = self.display_name;
        profile.photo_uri = self.photo_uri;
        if let Some(status) = self.status {
            profile.status = status;
        }
        profile
    }
}
