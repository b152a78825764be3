//! Validation utilities for crop prediction inputs and results
//!
//! Field input is never rejected: raw slider values are clamped into the
//! field's bounds and rounded to its step. Records that arrive from outside
//! (decoded forms, inference responses) are checked instead.

use rust_decimal::prelude::*;

use crate::models::{FieldId, FieldSpec, FormState, PredictionResult};

// ============================================================================
// Field Input
// ============================================================================

/// Clamp a raw value into `[min, max]` and round it to the field's step
///
/// Returns `None` for NaN. Infinities saturate at the nearest bound.
pub fn clamp_to_spec(spec: &FieldSpec, raw: f64) -> Option<Decimal> {
    if raw.is_nan() {
        return None;
    }

    let min = spec.min.to_f64()?;
    let max = spec.max.to_f64()?;
    let bounded = Decimal::from_f64(raw.clamp(min, max))?;

    // Bounds sit on the step grid, so rounding cannot escape them
    let value = bounded.round_dp_with_strategy(spec.decimal_places, RoundingStrategy::MidpointAwayFromZero);

    // Small negatives round to -0
    if value.is_zero() {
        return Some(Decimal::ZERO);
    }
    Some(value)
}

/// Check a value sits within the field's bounds and on its step grid
pub fn validate_field_value(field: FieldId, value: Decimal) -> Result<(), &'static str> {
    let spec = field.spec();
    if !spec.contains(value) {
        return Err("Field value out of range");
    }
    if value.round_dp(spec.decimal_places) != value {
        return Err("Field value is not a multiple of the field step");
    }
    Ok(())
}

/// Validate every field of a decoded form
pub fn validate_form(form: &FormState) -> Result<(), (FieldId, &'static str)> {
    for (field, value) in form.entries() {
        validate_field_value(field, value).map_err(|e| (field, e))?;
    }
    Ok(())
}

// ============================================================================
// Prediction Results
// ============================================================================

/// Check a percentage is within 0-100
pub fn validate_percentage(value: u8) -> Result<(), &'static str> {
    if value > 100 {
        return Err("Percentage must be between 0 and 100");
    }
    Ok(())
}

/// Validate a prediction record produced by an inference backend
pub fn validate_prediction(result: &PredictionResult) -> Result<(), &'static str> {
    if result.predictions.is_empty() {
        return Err("Prediction must contain at least one candidate crop");
    }
    for candidate in &result.predictions {
        if candidate.crop.trim().is_empty() {
            return Err("Candidate crop name cannot be empty");
        }
        validate_percentage(candidate.confidence)
            .map_err(|_| "Candidate confidence must be between 0 and 100")?;
    }
    if result.best_crop != result.predictions[0] {
        return Err("Best crop must be the first candidate");
    }
    validate_percentage(result.soil_health)
        .map_err(|_| "Soil health must be between 0 and 100")?;
    Ok(())
}
