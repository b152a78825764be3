//! Crop prediction flow and its HTTP host
//!
//! The [`flow`] module holds the form state machine; [`external`] holds the
//! prediction backends it can run against. The remaining modules expose flows
//! as HTTP sessions.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod flow;
pub mod handlers;
pub mod routes;
pub mod services;

pub use config::Config;
pub use flow::{FlowCompletion, FlowOutcome, PredictionFlow, SubmissionState};
pub use services::SessionService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionService,
    pub config: Arc<Config>,
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Crop Prediction API v1.0"
}
