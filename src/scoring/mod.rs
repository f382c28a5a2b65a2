//! Scoring Module - probability, verdict and threshold band
//!
//! `score` runs the whole request path: presence validation, vector
//! construction in feature order, inference, and banding.

pub mod threshold;
pub mod vector;

pub use threshold::{check_margin, classify, MarginError, ThresholdBand, Verdict, MAX_MARGIN, MIN_MARGIN};
pub use vector::{applicant_from_values, feature_vector, missing_features, Applicant};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::artifact::ScoringArtifact;
use crate::model::{Classifier, ModelError, RISKY_CLASS};

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("Missing features: {}", .0.join(", "))]
    MissingFeatures(Vec<String>),

    #[error("could not convert feature '{feature}' to float: {value}")]
    NonNumeric { feature: String, value: String },

    #[error("model returned a non-finite probability ({0})")]
    NonFiniteProbability(f64),

    #[error("inference failed: {0}")]
    Model(#[from] ModelError),
}

/// Scoring output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringResult {
    /// Probability of the risky class
    pub probability_risky: f64,
    /// Complement, probability of the reliable class
    pub probability_reliable: f64,
    pub band: ThresholdBand,
    pub verdict: Verdict,
}

/// Score one applicant against the artifact with the given margin
pub fn score(artifact: &ScoringArtifact, applicant: &Applicant, margin: f64) -> Result<ScoringResult, ScoringError> {
    let x = feature_vector(&artifact.features, applicant)?;

    let proba = artifact.model.predict_proba(x.view())?;
    let p = proba[RISKY_CLASS];
    if !p.is_finite() {
        return Err(ScoringError::NonFiniteProbability(p));
    }

    let band = ThresholdBand::new(artifact.optimal_threshold, margin);
    Ok(ScoringResult {
        probability_risky: p,
        probability_reliable: 1.0 - p,
        band,
        verdict: band.classify(p),
    })
}
