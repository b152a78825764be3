//! Prediction backend seam
//!
//! A [`Predictor`] turns a form into a [`PredictionResult`]. The flow only
//! talks to this trait, so the mock below and a real inference service are
//! interchangeable.

use std::time::Duration;

use async_trait::async_trait;
use shared::{CropCandidate, FormState, PredictionResult, YieldCategory};
use thiserror::Error;

/// Failure of a prediction backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PredictionError {
    #[error("Prediction timed out after {0:?}")]
    Timeout(Duration),

    #[error("Inference backend error: {0}")]
    Backend(String),

    #[error("Invalid inference response: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait Predictor: Send + Sync {
    /// Produce a prediction for `form`
    async fn predict(&self, form: &FormState) -> Result<PredictionResult, PredictionError>;

    /// Short name used in logs and health output
    fn name(&self) -> &str;
}

/// Stand-in predictor: waits a fixed delay, then returns a fixed payload
#[derive(Debug, Clone)]
pub struct MockPredictor {
    delay: Duration,
}

impl MockPredictor {
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(3000);

    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// The fixed result, carrying `form` as its input data
    pub fn payload(form: &FormState) -> PredictionResult {
        let predictions = vec![
            CropCandidate::new("Rice", 92, true, YieldCategory::High),
            CropCandidate::new("Wheat", 88, true, YieldCategory::Medium),
            CropCandidate::new("Corn", 75, true, YieldCategory::Medium),
            CropCandidate::new("Cotton", 45, false, YieldCategory::Low),
        ];
        let best_crop = predictions[0].clone();

        PredictionResult {
            predictions,
            best_crop,
            soil_health: 85,
            recommendations: vec![
                "Consider increasing phosphorus levels for optimal growth".to_string(),
                "Monitor humidity levels during growing season".to_string(),
                "Current pH level is ideal for rice cultivation".to_string(),
            ],
            input_data: form.clone(),
        }
    }
}

impl Default for MockPredictor {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}

#[async_trait]
impl Predictor for MockPredictor {
    async fn predict(&self, form: &FormState) -> Result<PredictionResult, PredictionError> {
        tokio::time::sleep(self.delay).await;
        Ok(Self::payload(form))
    }

    fn name(&self) -> &str {
        "mock"
    }
}
