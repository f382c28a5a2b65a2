//! Service description payloads

use serde::{Deserialize, Serialize};

use crate::explain::ExplainerKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: i64,
    pub model_family: String,
    pub feature_count: usize,
    pub artifact_sha256: String,
}

/// `GET /model_info`, what a client needs to build requests and verdicts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfoResponse {
    pub features: Vec<String>,
    pub optimal_threshold: f64,
    pub default_margin: f64,
    pub min_margin: f64,
    pub max_margin: f64,
    pub model_family: String,
    pub explainer: ExplainerKind,
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}
