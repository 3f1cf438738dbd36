//! Application fixtures
//!
//! Every fixture runs on the in-memory store with short poll timings so the
//! long-poll tests finish quickly.

use std::time::Duration;

use axum::http::StatusCode;
use axum::Router;
use chatline::backend::server::{create_app, AppState, ServerConfig};
use chatline::backend::store::Stores;
use chatline::shared::UserProfile;
use serde_json::json;

use super::http::post;

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

pub fn test_config() -> ServerConfig {
    ServerConfig::builder()
        .poll_ceiling(Duration::from_millis(1_500))
        .poll_interval(Duration::from_millis(200))
        .topic_capacity(16)
        .build()
        .expect("test config is valid")
}

pub fn test_app() -> TestApp {
    test_app_with(test_config())
}

pub fn test_app_with(config: ServerConfig) -> TestApp {
    let state = AppState::new(&config, Stores::in_memory());
    let router = create_app(state.clone(), &config);
    TestApp { router, state }
}

impl TestApp {
    /// Register a profile through `POST /api/users`
    pub async fn register(&self, username: &str) -> UserProfile {
        let response = post(
            &self.router,
            "/api/users",
            json!({
                "username": username,
                "email": format!("{username}@example.com"),
                "display_name": username.to_uppercase(),
            }),
        )
        .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        serde_json::from_value(response.body).expect("profile body")
    }
}
