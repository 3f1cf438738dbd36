/**
 * Topic Subscription (Server-Sent Events)
 *
 * `GET /api/topics/{userId}` streams every delivery published to the user's
 * topic. Each SSE event is named `messages` and carries the same one-element
 * JSON array the WebSocket channel sends.
 *
 * # Connection Management
 *
 * - Keep-alive comments every 30 seconds
 * - Lagged receivers skip the missed deliveries and keep streaming; the
 *   client can recover them with a conversation read or a poll
 * - The stream ends when the hub is drained at shutdown
 */

use std::convert::Infallible;
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
};
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};
use uuid::Uuid;

use super::hub::NotificationHub;
use crate::backend::error::{ApiPath, BackendError};

pub async fn handle_topic_subscription(
    State(hub): State<NotificationHub>,
    ApiPath(user_id): ApiPath<Uuid>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, BackendError> {
    let receiver = hub.subscribe(user_id).ok_or_else(|| {
        BackendError::handler(StatusCode::SERVICE_UNAVAILABLE, "server is shutting down")
    })?;
    tracing::info!("[Realtime] SSE subscriber attached to topic {}", user_id);

    let stream = BroadcastStream::new(receiver).filter_map(move |delivery| match delivery {
        Ok(payload) => match Event::default().event("messages").json_data(&payload) {
            Ok(event) => Some(Ok(event)),
            Err(err) => {
                tracing::error!("[Realtime] Failed to encode delivery: {:?}", err);
                None
            }
        },
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            tracing::warn!(
                "[Realtime] Topic {} subscriber lagged, skipped {} deliveries",
                user_id,
                skipped
            );
            None
        }
    });

    Ok(Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(30))
            .text("keep-alive"),
    ))
}
