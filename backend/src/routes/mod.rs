//! Route definitions for the crop prediction server

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/fields", get(handlers::list_fields))
        .route("/stats", get(handlers::get_stats))
        .nest("/sessions", session_routes())
}

/// Prediction session routes
fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_session))
        .route(
            "/:id",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route("/:id/fields/:field", put(handlers::set_field))
        .route("/:id/step/next", post(handlers::next_step))
        .route("/:id/step/previous", post(handlers::previous_step))
        .route("/:id/submit", post(handlers::submit_session))
}
