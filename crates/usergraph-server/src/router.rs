use axum::routing::{get, post, put};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handler::{self, AppState};

/// Build the axum router with all usergraph endpoints.
pub fn build_router(graph: AppState) -> Router {
    Router::new()
        .route("/v1/health", get(handler::health_handler))
        .route("/v1/info", get(handler::info_handler))
        .route("/users", post(handler::create_user))
        .route(
            "/users/:user_id",
            get(handler::find_user).put(handler::update_user),
        )
        .route("/users/:user_id/connectedUsers", get(handler::connected_users))
        .route(
            "/users/:user_id/connectedUsers/:dest_id",
            put(handler::add_connected_user),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(graph)
}
