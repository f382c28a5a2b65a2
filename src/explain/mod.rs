//! Explain Module - local feature attributions
//!
//! Two Shapley-value methods, chosen per model family at load time:
//! exact TreeSHAP for gradient-boosted trees and permutation sampling for
//! anything else. Both produce one contribution per feature plus a baseline.

pub mod engine;
pub mod permutation;
pub mod tree_shap;
pub mod types;

pub use engine::{random_sample, Explainer};
pub use permutation::{PermutationExplainer, DEFAULT_PERMUTATIONS};
pub use types::{Attribution, ClassOutput, ExplainerKind};

use thiserror::Error;

use crate::model::ModelError;
use crate::scoring::ScoringError;

#[derive(Debug, Error)]
pub enum ExplainError {
    #[error("unsupported model type for tree explainer: {0}")]
    UnsupportedModel(&'static str),

    #[error("attribution has {got} values for {expected} features")]
    ShapeMismatch { expected: usize, got: usize },

    #[error("explainer produced {available} class outputs, class {class} requested")]
    MissingClass { class: usize, available: usize },

    #[error("model evaluation failed: {0}")]
    Model(#[from] ModelError),

    #[error(transparent)]
    Input(#[from] ScoringError),
}
