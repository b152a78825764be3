//! Domain models for crop prediction

mod field;
mod form;
mod prediction;
mod stats;

pub use field::*;
pub use form::*;
pub use prediction::*;
pub use stats::*;
