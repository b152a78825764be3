//! Crop prediction result models

use serde::{Deserialize, Serialize};

use super::form::FormState;

/// Coarse expected yield for a candidate crop
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum YieldCategory {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for YieldCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            YieldCategory::Low => write!(f, "Low"),
            YieldCategory::Medium => write!(f, "Medium"),
            YieldCategory::High => write!(f, "High"),
        }
    }
}

/// One crop the engine considered
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CropCandidate {
    pub crop: String,
    /// Confidence percentage (0-100)
    pub confidence: u8,
    pub suitable: bool,
    #[serde(rename = "yield")]
    pub yield_category: YieldCategory,
}

impl CropCandidate {
    pub fn new(crop: impl Into<String>, confidence: u8, suitable: bool, yield_category: YieldCategory) -> Self {
        Self {
            crop: crop.into(),
            confidence,
            suitable,
            yield_category,
        }
    }
}

/// Output record of one prediction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PredictionResult {
    /// Candidates, best first
    pub predictions: Vec<CropCandidate>,
    pub best_crop: CropCandidate,
    /// Aggregate soil health score (0-100)
    pub soil_health: u8,
    pub recommendations: Vec<String>,
    /// The form that produced this result
    pub input_data: FormState,
}

impl PredictionResult {
    /// Build a result whose best crop is the first candidate
    ///
    /// Returns `None` when there are no candidates.
    pub fn new(
        predictions: Vec<CropCandidate>,
        soil_health: u8,
        recommendations: Vec<String>,
        input_data: FormState,
    ) -> Option<Self> {
        let best_crop = predictions.first()?.clone();
        Some(Self {
            predictions,
            best_crop,
            soil_health,
            recommendations,
            input_data,
        })
    }
}
