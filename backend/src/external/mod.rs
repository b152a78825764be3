//! External prediction backends

pub mod inference;
pub mod predictor;

pub use inference::InferenceClient;
pub use predictor::{MockPredictor, PredictionError, Predictor};
