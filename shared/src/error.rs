//! Errors raised by the shared models

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Step {0} is outside the form sections (1-3)")]
    InvalidStep(u8),
}
