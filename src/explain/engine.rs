use ndarray::{Array1, ArrayView1};
use rand::Rng;

use super::permutation::PermutationExplainer;
use super::tree_shap::tree_shap;
use super::types::{Attribution, ExplainerKind};
use super::ExplainError;
use crate::artifact::ScoringArtifact;
use crate::model::{ModelFamily, RISKY_CLASS};

/// Attribution strategy, fixed when the artifact is loaded
#[derive(Debug, Clone)]
pub enum Explainer {
    Tree,
    Permutation(PermutationExplainer),
}

impl Explainer {
    /// Tree ensembles get exact TreeSHAP; every other family falls back to
    /// permutation sampling against the artifact background
    pub fn for_artifact(artifact: &ScoringArtifact, permutations: usize, seed: Option<u64>) -> Self {
        match &artifact.model {
            ModelFamily::GradientBoosting(_) => Explainer::Tree,
            _ => Explainer::Permutation(PermutationExplainer::new(artifact.background(), permutations, seed)),
        }
    }

    pub fn kind(&self) -> ExplainerKind {
        match self {
            Explainer::Tree => ExplainerKind::Tree,
            Explainer::Permutation(_) => ExplainerKind::Permutation,
        }
    }

    /// Explain one sample; per-class outputs are narrowed to the risky class
    pub fn explain(&self, model: &ModelFamily, x: ArrayView1<f64>) -> Result<Attribution, ExplainError> {
        let output = match (self, model) {
            (Explainer::Tree, ModelFamily::GradientBoosting(ensemble)) => tree_shap(ensemble, x)?,
            (Explainer::Tree, other) => return Err(ExplainError::UnsupportedModel(other.name())),
            (Explainer::Permutation(explainer), model) => explainer.explain(model, x)?,
        };

        let (values, base_value) = output.select(RISKY_CLASS)?;
        if values.len() != x.len() {
            return Err(ExplainError::ShapeMismatch {
                expected: x.len(),
                got: values.len(),
            });
        }

        Ok(Attribution {
            values,
            base_value,
            sample: x.to_vec(),
            method: self.kind(),
        })
    }
}

/// Synthetic sample with every coordinate uniform in [0, 1)
pub fn random_sample<R: Rng + ?Sized>(n_features: usize, rng: &mut R) -> Array1<f64> {
    Array1::from_shape_fn(n_features, |_| rng.gen::<f64>())
}
