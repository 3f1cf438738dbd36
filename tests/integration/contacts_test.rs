//! Contact workflow integration tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use uuid::Uuid;

use chatline::backend::server::{build_state, create_app, ServerConfig};

use crate::common::*;
use crate::{assert_error_body, assert_status};

fn statuses(body: &serde_json::Value) -> Vec<(String, String)> {
    body.as_array()
        .expect("array body")
        .iter()
        .map(|view| {
            (
                view["target_username"].as_str().unwrap_or("?").to_string(),
                view["status"].as_str().unwrap_or("?").to_string(),
            )
        })
        .collect()
}

#[tokio::test]
async fn test_request_then_accept_makes_mutual_contacts() {
    let app = test_app();
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;

    let sent = post(
        &app.router,
        "/api/contacts/sendRequest",
        json!({ "requester": alice.id, "recipient": bob.id }),
    )
    .await;
    assert_status!(sent, StatusCode::CREATED);
    assert_eq!(sent.body.as_array().unwrap().len(), 1);
    assert_eq!(sent.body[0]["status"], "PENDING");

    let bob_list = get(&app.router, &format!("/api/contacts/user/{}", bob.id)).await;
    assert_eq!(bob_list.body, json!([]));
    let alice_list = get(&app.router, &format!("/api/contacts/user/{}", alice.id)).await;
    assert_eq!(
        statuses(&alice_list.body),
        vec![("bob".to_string(), "Pending".to_string())]
    );

    let incoming = get(&app.router, &format!("/api/contacts/requests/{}", bob.id)).await;
    assert_eq!(incoming.body.as_array().unwrap().len(), 1);

    let accepted = post_empty(
        &app.router,
        &format!("/api/contacts/acceptRequest/{}/{}", bob.id, alice.id),
    )
    .await;
    assert_status!(accepted, StatusCode::OK);
    assert_eq!(accepted.body, json!(true));

    let alice_list = get(&app.router, &format!("/api/contacts/user/{}", alice.id)).await;
    let bob_list = get(&app.router, &format!("/api/contacts/user/{}", bob.id)).await;
    assert_eq!(
        statuses(&alice_list.body),
        vec![("bob".to_string(), "Accepted".to_string())]
    );
    assert_eq!(
        statuses(&bob_list.body),
        vec![("alice".to_string(), "Accepted".to_string())]
    );
    assert_eq!(bob_list.body[0]["target_display_name"], "ALICE");
    assert_eq!(bob_list.body[0]["target_email"], "alice@example.com");

    let incoming = get(&app.router, &format!("/api/contacts/requests/{}", bob.id)).await;
    assert_eq!(incoming.body, json!([]));
}

#[tokio::test]
async fn test_accept_without_request_is_404() {
    let app = test_app();
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;

    let response = post_empty(
        &app.router,
        &format!("/api/contacts/acceptRequest/{}/{}", bob.id, alice.id),
    )
    .await;
    assert_error_body!(response, StatusCode::NOT_FOUND);

    let alice_list = get(&app.router, &format!("/api/contacts/user/{}", alice.id)).await;
    assert_eq!(alice_list.body, json!([]));
}

#[tokio::test]
async fn test_resending_request_keeps_one_row() {
    let app = test_app();
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let body = json!({ "requester": alice.id, "recipient": bob.id });

    post(&app.router, "/api/contacts/sendRequest", body.clone()).await;
    let again = post(&app.router, "/api/contacts/sendRequest", body).await;

    assert_status!(again, StatusCode::CREATED);
    assert_eq!(again.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_reject_removes_request_without_contacts() {
    let app = test_app();
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    post(
        &app.router,
        "/api/contacts/sendRequest",
        json!({ "requester": alice.id, "recipient": bob.id }),
    )
    .await;

    let rejected = post_empty(
        &app.router,
        &format!("/api/contacts/rejectRequest/{}/{}", bob.id, alice.id),
    )
    .await;
    assert_eq!(rejected.body, json!(true));

    let alice_list = get(&app.router, &format!("/api/contacts/user/{}", alice.id)).await;
    let bob_list = get(&app.router, &format!("/api/contacts/user/{}", bob.id)).await;
    assert_eq!(alice_list.body, json!([]));
    assert_eq!(bob_list.body, json!([]));
}

#[tokio::test]
async fn test_invalid_requests() {
    let app = test_app();
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;

    let to_self = post(
        &app.router,
        "/api/contacts/sendRequest",
        json!({ "requester": alice.id, "recipient": alice.id }),
    )
    .await;
    assert_error_body!(to_self, StatusCode::BAD_REQUEST);

    post(
        &app.router,
        "/api/contacts/sendRequest",
        json!({ "requester": alice.id, "recipient": bob.id }),
    )
    .await;
    post_empty(
        &app.router,
        &format!("/api/contacts/acceptRequest/{}/{}", bob.id, alice.id),
    )
    .await;
    let already = post(
        &app.router,
        "/api/contacts/sendRequest",
        json!({ "requester": bob.id, "recipient": alice.id }),
    )
    .await;
    assert_error_body!(already, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_default_server_accepts_requests_between_unregistered_users() {
    let config = ServerConfig::builder().build().unwrap();
    let router = create_app(build_state(&config).await, &config);
    let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());

    let sent = post(
        &router,
        "/api/contacts/sendRequest",
        json!({ "requester": alice, "recipient": bob }),
    )
    .await;
    assert_status!(sent, StatusCode::CREATED);

    let accepted = post_empty(
        &router,
        &format!("/api/contacts/acceptRequest/{bob}/{alice}"),
    )
    .await;
    assert_eq!(accepted.body, json!(true));

    let alice_list = get(&router, &format!("/api/contacts/user/{alice}")).await;
    assert_eq!(alice_list.body[0]["target"], json!(bob));
    assert_eq!(alice_list.body[0]["status"], "Accepted");
    assert_eq!(alice_list.body[0]["target_username"], json!(null));
}

#[tokio::test]
async fn test_remove_contact_removes_both_directions() {
    let app = test_app();
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    post(
        &app.router,
        "/api/contacts/sendRequest",
        json!({ "requester": alice.id, "recipient": bob.id }),
    )
    .await;
    post_empty(
        &app.router,
        &format!("/api/contacts/acceptRequest/{}/{}", bob.id, alice.id),
    )
    .await;

    let removed = delete(&app.router, &format!("/api/contacts/{}/{}", bob.id, alice.id)).await;
    assert_status!(removed, StatusCode::NO_CONTENT);

    let alice_list = get(&app.router, &format!("/api/contacts/user/{}", alice.id)).await;
    let bob_list = get(&app.router, &format!("/api/contacts/user/{}", bob.id)).await;
    assert_eq!(alice_list.body, json!([]));
    assert_eq!(bob_list.body, json!([]));

    let again = delete(&app.router, &format!("/api/contacts/{}/{}", bob.id, alice.id)).await;
    assert_error_body!(again, StatusCode::NOT_FOUND);
}
