//! Inference service client
//!
//! Client for a remote crop inference microservice that accepts the form
//! as JSON and answers with ranked candidate crops.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use shared::{CropCandidate, FormState, PredictionResult};

use super::predictor::{PredictionError, Predictor};

/// Client for the inference microservice
#[derive(Clone)]
pub struct InferenceClient {
    api_endpoint: String,
    api_key: Option<String>,
    http_client: Client,
}

/// Response body from the inference API
///
/// The service does not echo the form back; the client attaches it.
#[derive(Debug, Deserialize)]
pub struct InferenceResponse {
    pub predictions: Vec<CropCandidate>,
    pub soil_health: u8,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl InferenceResponse {
    /// Turn the response into a checked result for `form`
    pub fn into_result(self, form: &FormState) -> Result<PredictionResult, PredictionError> {
        let result = PredictionResult::new(
            self.predictions,
            self.soil_health,
            self.recommendations,
            form.clone(),
        )
        .ok_or_else(|| PredictionError::InvalidResponse("no candidate crops".to_string()))?;

        shared::validate_prediction(&result)
            .map_err(|e| PredictionError::InvalidResponse(e.to_string()))?;

        Ok(result)
    }
}

impl InferenceClient {
    /// Create a new inference client
    pub fn new(
        api_endpoint: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, PredictionError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PredictionError::Backend(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_endpoint,
            api_key,
            http_client,
        })
    }
}

#[async_trait]
impl Predictor for InferenceClient {
    async fn predict(&self, form: &FormState) -> Result<PredictionResult, PredictionError> {
        let mut request = self
            .http_client
            .post(&self.api_endpoint)
            .header("Content-Type", "application/json")
            .json(form);
        if let Some(api_key) = &self.api_key {
            request = request.header("x-api-key", api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| PredictionError::Backend(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PredictionError::Backend(format!(
                "API returned {}: {}",
                status, body
            )));
        }

        let body: InferenceResponse = response
            .json()
            .await
            .map_err(|e| PredictionError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        tracing::debug!(candidates = body.predictions.len(), "Inference response received");

        body.into_result(form)
    }

    fn name(&self) -> &str {
        "remote"
    }
}
