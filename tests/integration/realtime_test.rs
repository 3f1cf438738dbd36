//! Push delivery integration tests (SSE topic stream)

use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::{header, Request, StatusCode};
use futures_util::{Stream, StreamExt};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use crate::assert_ok;
use crate::common::*;

/// Read SSE chunks until one carries a `data:` line and parse it
async fn next_event<S>(body: &mut S) -> Value
where
    S: Stream<Item = Result<Bytes, axum::Error>> + Unpin,
{
    let mut buffer = String::new();
    loop {
        let chunk = tokio::time::timeout(Duration::from_secs(2), body.next())
            .await
            .expect("timed out waiting for event")
            .expect("stream ended")
            .expect("body error");
        buffer.push_str(&String::from_utf8_lossy(&chunk));
        if let Some(data) = buffer
            .lines()
            .find_map(|line| line.strip_prefix("data:").map(str::trim))
        {
            return serde_json::from_str(data).expect("event data is json");
        }
    }
}

#[tokio::test]
async fn test_sse_topic_receives_message_for_both_participants() {
    let app = test_app();
    let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());

    let mut streams = Vec::new();
    for user in [alice, bob] {
        let response = assert_ok!(
            app.router
                .clone()
                .oneshot(
                    Request::builder()
                        .uri(format!("/api/topics/{user}"))
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
        );
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/event-stream"
        );
        streams.push(response.into_body().into_data_stream());
    }
    assert_eq!(app.state.hub.subscriber_count(alice), 1);

    let sent = post(
        &app.router,
        "/api/messages",
        json!({ "sender": alice, "receiver": bob, "text": "pushed" }),
    )
    .await;

    for stream in streams.iter_mut() {
        let delivery = next_event(stream).await;
        assert_eq!(delivery, json!([sent.body.clone()]));
    }
}

#[tokio::test]
async fn test_topic_subscription_refused_after_drain() {
    let app = test_app();
    app.state.begin_shutdown();

    let response = get(&app.router, &format!("/api/topics/{}", Uuid::new_v4())).await;
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_websocket_route_requires_upgrade() {
    let app = test_app();
    let response = get(&app.router, "/ws").await;
    assert!(response.status.is_client_error());
}
