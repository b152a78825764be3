//! HTTP handlers for prediction sessions

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::SessionView;
use crate::AppState;

/// Create a session with a fresh form
pub async fn create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionView>) {
    let session = state.sessions.create().await;
    (StatusCode::CREATED, Json(session))
}

/// Get a session by ID
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<SessionView>> {
    let session = state.sessions.get(session_id).await?;
    Ok(Json(session))
}

/// Discard a session
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.sessions.delete(session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Input for setting one field
#[derive(Debug, Deserialize)]
pub struct SetFieldInput {
    pub value: f64,
}

/// Set one field; out-of-range values are clamped
pub async fn set_field(
    State(state): State<AppState>,
    Path((session_id, field)): Path<(Uuid, String)>,
    Json(input): Json<SetFieldInput>,
) -> AppResult<Json<SessionView>> {
    let session = state
        .sessions
        .set_field(session_id, &field, input.value)
        .await?;
    Ok(Json(session))
}

/// Move to the next form section
pub async fn next_step(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<SessionView>> {
    let session = state.sessions.next_step(session_id).await?;
    Ok(Json(session))
}

/// Move to the previous form section
pub async fn previous_step(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<SessionView>> {
    let session = state.sessions.previous_step(session_id).await?;
    Ok(Json(session))
}

/// Submit the form; the prediction finishes in the background
pub async fn submit_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<(StatusCode, Json<SessionView>)> {
    let session = state.sessions.submit(session_id).await?;
    Ok((StatusCode::ACCEPTED, Json(session)))
}
