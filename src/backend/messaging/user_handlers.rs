//! User HTTP Handlers

use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;

use super::users::{UserError, UserService};
use crate::backend::error::{ApiJson, ApiPath, BackendError};
use crate::shared::messaging::{CreateUserRequest, UserProfile};

impl From<UserError> for BackendError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::Invalid(err) => err.into(),
            UserError::Store(err) => err.into(),
        }
    }
}

/// POST /api/users
pub async fn create_user(
    State(users): State<UserService>,
    ApiJson(request): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserProfile>), BackendError> {
    let profile = users.register(request).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// GET /api/users/{userId}
pub async fn get_user(
    State(users): State<UserService>,
    ApiPath(user_id): ApiPath<Uuid>,
) -> Result<Json<UserProfile>, BackendError> {
    Ok(Json(users.get(user_id).await?))
}
