//! HTTP routing

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::server::handlers;
use crate::server::state::AppState;
use crate::server::websocket::websocket_handler;

/// Build the HTTP and WebSocket router
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(handlers::health))
        .route("/stats", get(handlers::stats))
        .route(
            "/locations",
            get(handlers::list_locations).post(handlers::update_location),
        )
        .route("/locations/{asset_id}", get(handlers::get_location));

    Router::new()
        .nest("/api", api)
        .route("/ws", get(websocket_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
