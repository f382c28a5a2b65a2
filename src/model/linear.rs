//! Logistic regression model

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use super::{Classifier, ModelError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    /// One weight per feature, in feature-list order
    pub coefficients: Vec<f64>,
    #[serde(default)]
    pub intercept: f64,
}

impl LogisticModel {
    pub fn validate(&self, n_features: usize) -> Result<(), ModelError> {
        if self.coefficients.len() != n_features {
            return Err(ModelError::CoefficientCount {
                expected: n_features,
                found: self.coefficients.len(),
            });
        }
        if !self.intercept.is_finite() {
            return Err(ModelError::NonFiniteParameter("intercept"));
        }
        if self.coefficients.iter().any(|w| !w.is_finite()) {
            return Err(ModelError::NonFiniteParameter("coefficients"));
        }
        Ok(())
    }
}

impl Classifier for LogisticModel {
    fn decision_function(&self, x: ArrayView1<f64>) -> Result<f64, ModelError> {
        if x.len() != self.coefficients.len() {
            return Err(ModelError::ShapeMismatch {
                expected: self.coefficients.len(),
                got: x.len(),
            });
        }
        let weights = ArrayView1::from(self.coefficients.as_slice());
        Ok(self.intercept + weights.dot(&x))
    }
}
