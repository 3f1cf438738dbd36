//! HTTP helpers
//!
//! Requests go straight through the router with `tower::ServiceExt::oneshot`;
//! no socket is bound.

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

#[derive(Debug)]
pub struct JsonResponse {
    pub status: StatusCode,
    pub body: Value,
}

pub async fn request(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> JsonResponse {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("valid request");

    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router is infallible");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };

    JsonResponse { status, body }
}

pub async fn get(router: &Router, uri: &str) -> JsonResponse {
    request(router, Method::GET, uri, None).await
}

pub async fn post(router: &Router, uri: &str, body: Value) -> JsonResponse {
    request(router, Method::POST, uri, Some(body)).await
}

pub async fn post_empty(router: &Router, uri: &str) -> JsonResponse {
    request(router, Method::POST, uri, None).await
}

pub async fn put(router: &Router, uri: &str) -> JsonResponse {
    request(router, Method::PUT, uri, None).await
}

pub async fn delete(router: &Router, uri: &str) -> JsonResponse {
    request(router, Method::DELETE, uri, None).await
}
