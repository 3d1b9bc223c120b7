//! Route definitions

use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Method and path of every route, for the startup listing
pub const ROUTES: &[(&str, &str)] = &[
    ("GET", "/health"),
    ("GET", "/todos"),
    ("POST", "/todos"),
    ("GET", "/todos/search/tags?q=tag1,tag2"),
    ("GET", "/todos/:id"),
    ("PUT", "/todos/:id"),
    ("DELETE", "/todos/:id"),
    ("POST", "/todos/:id/complete"),
];

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let request_timeout = state.settings.server.request_timeout();

    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/todos",
            get(handlers::list_todos).post(handlers::create_todo),
        )
        .route("/todos/", get(handlers::list_todos).post(handlers::create_todo))
        // Static segment, takes priority over `/todos/:id`
        .route("/todos/search/tags", get(handlers::search_by_tags))
        .route(
            "/todos/:id",
            get(handlers::get_todo)
                .put(handlers::update_todo)
                .delete(handlers::delete_todo),
        )
        .route("/todos/:id/complete", post(handlers::complete_todo))
        // Add middleware
        .layer(TimeoutLayer::new(request_timeout))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        // Add state
        .with_state(state)
}
