//! User Registration
//!
//! Thin service over the `UserDirectory`. Profiles registered here are what
//! contact listings join against.

use std::sync::Arc;

use uuid::Uuid;

use crate::backend::store::{StoreError, StoreResult, UserDirectory};
use crate::shared::messaging::{CreateUserRequest, UserProfile};
use crate::shared::SharedError;

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error(transparent)]
    Invalid(#[from] SharedError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserDirectory>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserDirectory>) -> Self {
        Self { users }
    }

    /// Register a new profile. Duplicate usernames or emails are a `Conflict`.
    pub async fn register(&self, request: CreateUserRequest) -> Result<UserProfile, UserError> {
        request.validate()?;
        let profile = self.users.register(request.into_profile()).await?;
        tracing::info!("[Users] Registered {} as {}", profile.username, profile.id);
        Ok(profile)
    }

    pub async fn get(&self, id: Uuid) -> StoreResult<UserProfile> {
        self.users
            .find_by_ids(&[id])
            .await?
            .into_iter()
            .next()
            .ok_or(StoreError::not_found("user"))
    }
}
