//! Message API integration tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use uuid::Uuid;

use crate::common::*;
use crate::{assert_error_body, assert_status};

fn texts(body: &serde_json::Value) -> Vec<String> {
    body.as_array()
        .expect("array body")
        .iter()
        .map(|m| m["text"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[tokio::test]
async fn test_post_message_assigns_id_and_timestamp() {
    let app = test_app();
    let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());

    let response = post(
        &app.router,
        "/api/messages",
        json!({ "sender": alice, "receiver": bob, "text": "hello", "created_at": 1 }),
    )
    .await;

    assert_status!(response, StatusCode::CREATED);
    assert!(response.body["id"].is_string());
    assert!(response.body["created_at"].as_i64().unwrap() > 1);
    assert_eq!(response.body["is_deleted"], false);

    let id = response.body["id"].as_str().unwrap();
    let fetched = get(&app.router, &format!("/api/messages/{id}")).await;
    assert_status!(fetched, StatusCode::OK);
    assert_eq!(fetched.body, response.body);
}

#[tokio::test]
async fn test_conversation_is_ordered_and_symmetric() {
    let app = test_app();
    let (alice, bob, carol) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

    for (sender, receiver, text) in [
        (alice, bob, "one"),
        (bob, alice, "two"),
        (alice, carol, "elsewhere"),
        (alice, bob, "three"),
    ] {
        let response = post(
            &app.router,
            "/api/messages",
            json!({ "sender": sender, "receiver": receiver, "text": text }),
        )
        .await;
        assert_status!(response, StatusCode::CREATED);
    }

    let forward = get(
        &app.router,
        &format!("/api/messages/conversation?user1={alice}&user2={bob}"),
    )
    .await;
    let backward = get(
        &app.router,
        &format!("/api/messages/conversation?user1={bob}&user2={alice}"),
    )
    .await;

    assert_eq!(texts(&forward.body), vec!["one", "two", "three"]);
    assert_eq!(forward.body, backward.body);
}

#[tokio::test]
async fn test_soft_delete_hides_message_from_conversation() {
    let app = test_app();
    let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
    let sent = post(
        &app.router,
        "/api/messages",
        json!({ "sender": alice, "receiver": bob, "text": "oops" }),
    )
    .await;
    let id = sent.body["id"].as_str().unwrap().to_string();

    let deleted = put(&app.router, &format!("/api/messages/{id}/delete")).await;
    assert_status!(deleted, StatusCode::OK);
    assert_eq!(deleted.body["is_deleted"], true);

    let visible = get(
        &app.router,
        &format!("/api/messages/conversation?user1={alice}&user2={bob}"),
    )
    .await;
    assert_eq!(visible.body, json!([]));

    let everything = get(
        &app.router,
        &format!("/api/messages/conversation?user1={alice}&user2={bob}&include_deleted=true"),
    )
    .await;
    assert_eq!(texts(&everything.body), vec!["oops"]);
}

#[tokio::test]
async fn test_missing_message_is_404() {
    let app = test_app();
    let missing = Uuid::new_v4();

    let response = put(&app.router, &format!("/api/messages/{missing}/delete")).await;
    assert_error_body!(response, StatusCode::NOT_FOUND);

    let response = get(&app.router, &format!("/api/messages/{missing}")).await;
    assert_error_body!(response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_purge_removes_message() {
    let app = test_app();
    let sent = post(
        &app.router,
        "/api/messages",
        json!({ "sender": Uuid::new_v4(), "receiver": Uuid::new_v4(), "text": "bye" }),
    )
    .await;
    let id = sent.body["id"].as_str().unwrap().to_string();

    let purged = delete(&app.router, &format!("/api/messages/{id}")).await;
    assert_status!(purged, StatusCode::NO_CONTENT);

    let again = delete(&app.router, &format!("/api/messages/{id}")).await;
    assert_error_body!(again, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_blank_message_is_400() {
    let app = test_app();

    let response = post(
        &app.router,
        "/api/messages",
        json!({ "sender": Uuid::new_v4(), "receiver": Uuid::new_v4(), "text": "  " }),
    )
    .await;

    assert_error_body!(response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_by_sender_and_receiver() {
    let app = test_app();
    let (alice, bob, carol) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    for (sender, receiver) in [(alice, bob), (alice, carol), (bob, carol)] {
        post(
            &app.router,
            "/api/messages",
            json!({ "sender": sender, "receiver": receiver, "text": "x" }),
        )
        .await;
    }

    let from_alice = get(&app.router, &format!("/api/messages/sender/{alice}")).await;
    let to_carol = get(&app.router, &format!("/api/messages/receiver/{carol}")).await;

    assert_eq!(from_alice.body.as_array().unwrap().len(), 2);
    assert_eq!(to_carol.body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = test_app();
    let response = get(&app.router, "/api/nope").await;
    assert_status!(response, StatusCode::NOT_FOUND);
}
