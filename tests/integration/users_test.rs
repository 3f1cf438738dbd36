//! User registration and request-rejection integration tests

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use crate::common::*;
use crate::{assert_error_body, assert_status};

#[tokio::test]
async fn test_register_and_fetch_user() {
    let app = test_app();

    let created = post(
        &app.router,
        "/api/users",
        json!({ "username": "alice", "email": "alice@example.com", "photo_uri": "a.png" }),
    )
    .await;
    assert_status!(created, StatusCode::CREATED);
    assert_eq!(created.body["status"], "offline");

    let id = created.body["id"].as_str().unwrap();
    let fetched = get(&app.router, &format!("/api/users/{id}")).await;
    assert_status!(fetched, StatusCode::OK);
    assert_eq!(fetched.body, created.body);
}

#[tokio::test]
async fn test_duplicate_username_or_email_conflicts() {
    let app = test_app();
    app.register("alice").await;

    let same_name = post(
        &app.router,
        "/api/users",
        json!({ "username": "alice", "email": "second@example.com" }),
    )
    .await;
    assert_error_body!(same_name, StatusCode::CONFLICT);

    let same_email = post(
        &app.router,
        "/api/users",
        json!({ "username": "alicia", "email": "alice@example.com" }),
    )
    .await;
    assert_error_body!(same_email, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_unknown_user_is_404() {
    let app = test_app();
    let response = get(&app.router, &format!("/api/users/{}", Uuid::new_v4())).await;
    assert_error_body!(response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_json_gets_json_error_body() {
    let app = test_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/messages")
        .header("content-type", "application/json")
        .body(Body::from("{ not json"))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).expect("json error body");
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn test_missing_fields_get_json_error_body() {
    let app = test_app();
    let response = post(&app.router, "/api/users", json!({ "username": "alice" })).await;
    assert_error_body!(response, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_bad_uuid_path_gets_json_error_body() {
    let app = test_app();

    let response = get(&app.router, "/api/messages/not-a-uuid").await;
    assert_error_body!(response, StatusCode::BAD_REQUEST);

    let response = post_empty(&app.router, "/api/contacts/acceptRequest/x/y").await;
    assert_error_body!(response, StatusCode::BAD_REQUEST);
}
