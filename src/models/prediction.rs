//! Prediction payloads

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::scoring::{ScoringResult, Verdict};

/// `POST /predict` query string
#[derive(Debug, Default, Deserialize, Validate)]
pub struct PredictParams {
    /// Grey-zone margin; the server default applies when absent
    #[validate(range(min = 0.0, max = 0.1))]
    pub margin: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub prediction: Verdict,
    pub probability_class_1: f64,
    pub probability_class_0: f64,
    pub optimal_threshold: f64,
    pub margin: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

impl From<ScoringResult> for PredictionResponse {
    fn from(result: ScoringResult) -> Self {
        Self {
            prediction: result.verdict,
            probability_class_1: result.probability_risky,
            probability_class_0: result.probability_reliable,
            optimal_threshold: result.band.threshold,
            margin: result.band.margin,
            lower_bound: result.band.lower,
            upper_bound: result.band.upper,
        }
    }
}
