//! Shared types and models for the crop prediction flow
//!
//! This crate contains types shared between the backend, the frontend (via
//! WASM), and any inference service that speaks the same JSON.

pub mod error;
pub mod models;
pub mod validation;

pub use error::*;
pub use models::*;
pub use validation::*;
