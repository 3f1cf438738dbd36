//! Contact HTTP Handlers

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::contacts::{ContactError, ContactService};
use crate::backend::error::{ApiJson, ApiPath, BackendError};
use crate::shared::messaging::{ContactRequest, ContactView, SendContactRequest};

impl From<ContactError> for BackendError {
    fn from(err: ContactError) -> Self {
        match err {
            ContactError::Invalid(err) => err.into(),
            ContactError::Store(err) => err.into(),
        }
    }
}

/// POST /api/contacts/sendRequest
///
/// Returns the requester's outstanding requests.
pub async fn send_contact_request(
    State(contacts): State<ContactService>,
    ApiJson(request): ApiJson<SendContactRequest>,
) -> Result<(StatusCode, Json<Vec<ContactRequest>>), BackendError> {
    let outstanding = contacts.send_request(request).await?;
    Ok((StatusCode::CREATED, Json(outstanding)))
}

/// POST /api/contacts/acceptRequest/{userId}/{requesterId}
pub async fn accept_contact_request(
    State(contacts): State<ContactService>,
    ApiPath((user_id, requester_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<Json<bool>, BackendError> {
    Ok(Json(contacts.accept_request(user_id, requester_id).await?))
}

/// POST /api/contacts/rejectRequest/{userId}/{requesterId}
pub async fn reject_contact_request(
    State(contacts): State<ContactService>,
    ApiPath((user_id, requester_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<Json<bool>, BackendError> {
    Ok(Json(contacts.reject_request(user_id, requester_id).await?))
}

/// GET /api/contacts/user/{userId}
pub async fn list_contacts(
    State(contacts): State<ContactService>,
    ApiPath(user_id): ApiPath<Uuid>,
) -> Result<Json<Vec<ContactView>>, BackendError> {
    Ok(Json(contacts.list_contacts(user_id).await?))
}

/// GET /api/contacts/requests/{userId}
pub async fn list_incoming_requests(
    State(contacts): State<ContactService>,
    ApiPath(user_id): ApiPath<Uuid>,
) -> Result<Json<Vec<ContactRequest>>, BackendError> {
    Ok(Json(contacts.incoming_requests(user_id).await?))
}

/// DELETE /api/contacts/{userId}/{otherId}
pub async fn remove_contact(
    State(contacts): State<ContactService>,
    ApiPath((user_id, other_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<StatusCode, BackendError> {
    contacts.remove_contact(user_id, other_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
