//! HTTP handlers for the field table

use axum::Json;
use shared::FieldSpec;

/// List every input field with its bounds, unit, and section
pub async fn list_fields() -> Json<Vec<FieldSpec>> {
    Json(shared::field_specs())
}
