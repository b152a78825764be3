//! HTTP handlers for user stats

use axum::{extract::State, Json};
use shared::UserStats;

use crate::AppState;

/// Get the current user stats
pub async fn get_stats(State(state): State<AppState>) -> Json<UserStats> {
    Json(state.sessions.stats().await)
}
