//! WebAssembly module for the crop prediction flow
//!
//! Provides client-side computation for:
//! - The field table and default form
//! - Clamping slider input to field bounds and steps
//! - Section cursor moves
//! - User stats after a completed prediction

use rust_decimal::prelude::ToPrimitive;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::log_1(&JsValue::from_str("crop prediction module loaded"));
}

fn js_err(message: String) -> JsValue {
    JsValue::from_str(&message)
}

/// Field table as JSON, in section order
#[wasm_bindgen]
pub fn field_specs_json() -> Result<String, JsValue> {
    serde_json::to_string(&field_specs()).map_err(|e| js_err(e.to_string()))
}

/// Default form as JSON
#[wasm_bindgen]
pub fn default_form_json() -> Result<String, JsValue> {
    serde_json::to_string(&FormState::default()).map_err(|e| js_err(e.to_string()))
}

fn clamp_value(field: &str, raw: f64) -> Result<f64, String> {
    let field: FieldId = field.parse().map_err(|e: shared::FieldError| e.to_string())?;
    clamp_to_spec(&field.spec(), raw)
        .and_then(|value| value.to_f64())
        .ok_or_else(|| format!("Value for {} is not a number", field))
}

/// Clamp a slider value into the field's bounds and step
#[wasm_bindgen]
pub fn clamp_field_value(field: &str, raw: f64) -> Result<f64, JsValue> {
    clamp_value(field, raw).map_err(js_err)
}

fn set_field(form_json: &str, field: &str, raw: f64) -> Result<String, String> {
    let mut form: FormState =
        serde_json::from_str(form_json).map_err(|e| format!("Invalid form JSON: {}", e))?;
    validate_form(&form).map_err(|(field, e)| format!("{}: {}", field, e))?;

    let field: FieldId = field.parse().map_err(|e: shared::FieldError| e.to_string())?;
    form.set(field, raw);

    serde_json::to_string(&form).map_err(|e| e.to_string())
}

/// Apply one field edit to a form and return the updated form JSON
#[wasm_bindgen]
pub fn set_form_field(form_json: &str, field: &str, raw: f64) -> Result<String, JsValue> {
    set_field(form_json, field, raw).map_err(js_err)
}

/// Next section number, saturating at the last
#[wasm_bindgen]
pub fn next_step(step: u8) -> u8 {
    let mut cursor = StepCursor::at(step);
    cursor.advance();
    cursor.get()
}

/// Previous section number, saturating at the first
#[wasm_bindgen]
pub fn previous_step(step: u8) -> u8 {
    let mut cursor = StepCursor::at(step);
    cursor.retreat();
    cursor.get()
}

/// Title of section `step` (1-3)
#[wasm_bindgen]
pub fn section_title(step: u8) -> Result<String, JsValue> {
    Section::from_number(step)
        .map(|section| section.title().to_string())
        .map_err(|e| js_err(e.to_string()))
}

/// Field names shown in section `step` (1-3)
#[wasm_bindgen]
pub fn section_fields(step: u8) -> Result<js_sys::Array, JsValue> {
    let section = Section::from_number(step).map_err(|e| js_err(e.to_string()))?;
    Ok(section
        .fields()
        .into_iter()
        .map(|field| JsValue::from_str(field.as_str()))
        .collect())
}

fn record(stats_json: &str) -> Result<String, String> {
    let mut stats: UserStats =
        serde_json::from_str(stats_json).map_err(|e| format!("Invalid stats JSON: {}", e))?;
    stats.on_prediction_complete();
    serde_json::to_string(&stats).map_err(|e| e.to_string())
}

/// Apply a completed prediction to the user stats JSON
#[wasm_bindgen]
pub fn record_prediction(stats_json: &str) -> Result<String, JsValue> {
    record(stats_json).map_err(js_err)
}
