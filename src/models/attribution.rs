//! Attribution payloads

use serde::{Deserialize, Serialize};

use crate::explain::{Attribution, ExplainerKind};

/// `GET|POST /shap_values` response, every array aligned with `features_names`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapValuesResponse {
    pub shap_values: Vec<f64>,
    pub base_values: f64,
    pub features_names: Vec<String>,
    pub sample_values: Vec<f64>,
    pub explainer: ExplainerKind,
}

impl ShapValuesResponse {
    pub fn new(attribution: Attribution, feature_names: &[String]) -> Self {
        Self {
            shap_values: attribution.values,
            base_values: attribution.base_value,
            features_names: feature_names.to_vec(),
            sample_values: attribution.sample,
            explainer: attribution.method,
        }
    }
}
