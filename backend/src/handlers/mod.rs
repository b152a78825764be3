//! HTTP handlers

mod fields;
mod health;
mod sessions;
mod stats;

pub use fields::*;
pub use health::*;
pub use sessions::*;
pub use stats::*;
