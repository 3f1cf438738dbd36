//! Message HTTP Handlers
//!
//! Conversation reads, the long poll, sending and the soft/hard delete
//! endpoints. Every handler returns `BackendError` on failure, which renders
//! as a JSON `{"error", "status"}` body.

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::long_poll::LongPollCoordinator;
use super::service::{MessageService, SendError};
use crate::backend::error::{ApiJson, ApiPath, ApiQuery, BackendError};
use crate::shared::messaging::{ConversationParams, Message, PollParams, SendMessageRequest};

impl From<SendError> for BackendError {
    fn from(err: SendError) -> Self {
        match err {
            SendError::Invalid(err) => err.into(),
            SendError::Store(err) => err.into(),
        }
    }
}

/// GET /api/messages/conversation?user1&user2[&include_deleted]
pub async fn get_conversation(
    State(messages): State<MessageService>,
    ApiQuery(params): ApiQuery<ConversationParams>,
) -> Result<Json<Vec<Message>>, BackendError> {
    let conversation = messages
        .conversation(params.user1, params.user2, params.include_deleted)
        .await?;
    Ok(Json(conversation))
}

/// GET /api/messages/poll?user1&user2&since
///
/// Always 200 unless the store fails; a timeout or shutdown yields `[]`.
pub async fn poll_messages(
    State(long_poll): State<LongPollCoordinator>,
    ApiQuery(params): ApiQuery<PollParams>,
) -> Result<Json<Vec<Message>>, BackendError> {
    tracing::debug!(
        "[LongPoll] Poll {} <-> {} since {}",
        params.user1,
        params.user2,
        params.since
    );
    let outcome = long_poll
        .wait_for_messages(params.user1, params.user2, params.since)
        .await?;
    Ok(Json(outcome.into_messages()))
}

/// POST /api/messages
pub async fn send_message(
    State(messages): State<MessageService>,
    ApiJson(request): ApiJson<SendMessageRequest>,
) -> Result<(StatusCode, Json<Message>), BackendError> {
    let saved = messages.send(request).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

/// GET /api/messages/{id}
pub async fn get_message(
    State(messages): State<MessageService>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Message>, BackendError> {
    Ok(Json(messages.get(id).await?))
}

/// GET /api/messages/sender/{id}
pub async fn get_messages_by_sender(
    State(messages): State<MessageService>,
    ApiPath(sender): ApiPath<Uuid>,
) -> Result<Json<Vec<Message>>, BackendError> {
    Ok(Json(messages.by_sender(sender).await?))
}

/// GET /api/messages/receiver/{id}
pub async fn get_messages_by_receiver(
    State(messages): State<MessageService>,
    ApiPath(receiver): ApiPath<Uuid>,
) -> Result<Json<Vec<Message>>, BackendError> {
    Ok(Json(messages.by_receiver(receiver).await?))
}

/// PUT /api/messages/{id}/delete
pub async fn soft_delete_message(
    State(messages): State<MessageService>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Message>, BackendError> {
    Ok(Json(messages.soft_delete(id).await?))
}

/// DELETE /api/messages/{id}
pub async fn purge_message(
    State(messages): State<MessageService>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, BackendError> {
    messages.purge(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
