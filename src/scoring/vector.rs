//! Feature vector construction
//!
//! Applicants arrive as a flat JSON mapping feature-name → value. The vector
//! handed to the model is built by indexing that mapping in the artifact's
//! feature order; extra keys are ignored.

use ndarray::Array1;
use serde_json::{Map, Value};

use super::ScoringError;

/// Applicant payload: feature name → value
pub type Applicant = Map<String, Value>;

/// Required feature names absent from the applicant, in feature-list order
pub fn missing_features(features: &[String], applicant: &Applicant) -> Vec<String> {
    features
        .iter()
        .filter(|name| !applicant.contains_key(name.as_str()))
        .cloned()
        .collect()
}

/// Build the model input vector. Fails on missing features before any value
/// is converted.
pub fn feature_vector(features: &[String], applicant: &Applicant) -> Result<Array1<f64>, ScoringError> {
    let missing = missing_features(features, applicant);
    if !missing.is_empty() {
        return Err(ScoringError::MissingFeatures(missing));
    }

    features
        .iter()
        .map(|name| to_float(name, &applicant[name.as_str()]))
        .collect::<Result<Vec<_>, _>>()
        .map(Array1::from_vec)
}

fn to_float(feature: &str, value: &Value) -> Result<f64, ScoringError> {
    match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| non_numeric(feature, value)),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.trim().parse().map_err(|_| non_numeric(feature, value)),
        // null is a missing value; trees route it through their default branch
        Value::Null => Ok(f64::NAN),
        _ => Err(non_numeric(feature, value)),
    }
}

fn non_numeric(feature: &str, value: &Value) -> ScoringError {
    ScoringError::NonNumeric {
        feature: feature.to_string(),
        value: value.to_string(),
    }
}

/// Inverse of [`feature_vector`], used by clients that hold dataset rows
pub fn applicant_from_values(features: &[String], values: &[f64]) -> Applicant {
    features
        .iter()
        .zip(values)
        .map(|(name, v)| {
            let value = serde_json::Number::from_f64(*v).map(Value::Number).unwrap_or(Value::Null);
            (name.clone(), value)
        })
        .collect()
}
