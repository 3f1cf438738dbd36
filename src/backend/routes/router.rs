/**
 * Router Configuration
 *
 * Combines the API routes and the WebSocket push channel into one router,
 * with request tracing and a 404 fallback.
 *
 * # Routes
 *
 * - `/api/...` - see `api_routes`
 * - `GET /ws` - WebSocket push channel
 */

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::backend::realtime::handle_push_socket;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;

pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new().route("/ws", get(handle_push_socket));

    let router = configure_api_routes(router);

    let router = router.fallback(|| async { (axum::http::StatusCode::NOT_FOUND, "404 Not Found") });

    router
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(app_state)
}
