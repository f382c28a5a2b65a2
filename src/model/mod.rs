//! Model Module - classifier families and inference
//!
//! A scoring artifact carries exactly one model family, picked when the
//! artifact is deserialized. Every family answers with a binary probability
//! pair `[reliable, risky]`.

pub mod linear;
pub mod tree;

pub use linear::LogisticModel;
pub use tree::{Node, Tree, TreeEnsemble};

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Index of the risky class in a binary probability pair
pub const RISKY_CLASS: usize = 1;

/// Model errors (load-time validation and inference)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("tree {tree}: {reason}")]
    InvalidTree { tree: usize, reason: String },

    #[error("expected {expected} coefficients, found {found}")]
    CoefficientCount { expected: usize, found: usize },

    #[error("model parameter `{0}` is not finite")]
    NonFiniteParameter(&'static str),

    #[error("feature index {index} out of range for a vector of length {len}")]
    FeatureOutOfRange { index: usize, len: usize },

    #[error("input has {got} features, model expects {expected}")]
    ShapeMismatch { expected: usize, got: usize },
}

/// Binary classifier over a fixed-length feature vector
pub trait Classifier {
    /// Raw decision value (log-odds of the risky class)
    fn decision_function(&self, x: ArrayView1<f64>) -> Result<f64, ModelError>;

    /// Probability pair `[reliable, risky]`
    fn predict_proba(&self, x: ArrayView1<f64>) -> Result<[f64; 2], ModelError> {
        let p = sigmoid(self.decision_function(x)?);
        Ok([1.0 - p, p])
    }
}

/// Supported model families, tagged by `family` in the artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum ModelFamily {
    GradientBoosting(TreeEnsemble),
    Logistic(LogisticModel),
}

impl ModelFamily {
    pub fn name(&self) -> &'static str {
        match self {
            ModelFamily::GradientBoosting(_) => "gradient_boosting",
            ModelFamily::Logistic(_) => "logistic",
        }
    }

    /// Check the model against the artifact's feature layout
    pub fn validate(&self, n_features: usize) -> Result<(), ModelError> {
        match self {
            ModelFamily::GradientBoosting(ensemble) => ensemble.validate(n_features),
            ModelFamily::Logistic(model) => model.validate(n_features),
        }
    }
}

impl Classifier for ModelFamily {
    fn decision_function(&self, x: ArrayView1<f64>) -> Result<f64, ModelError> {
        match self {
            ModelFamily::GradientBoosting(ensemble) => ensemble.decision_function(x),
            ModelFamily::Logistic(model) => model.decision_function(x),
        }
    }
}

pub fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_sigmoid_midpoint() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!((sigmoid(9f64.ln()) - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_family_tag_roundtrip() {
        let json = r#"{"family":"logistic","coefficients":[1.0,-1.0],"intercept":0.5}"#;
        let model: ModelFamily = serde_json::from_str(json).unwrap();
        assert_eq!(model.name(), "logistic");

        let proba = model.predict_proba(array![1.0, 1.0].view()).unwrap();
        assert!((proba[0] + proba[1] - 1.0).abs() < 1e-12);
        assert!((proba[RISKY_CLASS] - sigmoid(0.5)).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_family_rejected() {
        let json = r#"{"family":"neural_net","layers":[]}"#;
        assert!(serde_json::from_str::<ModelFamily>(json).is_err());
    }
}
