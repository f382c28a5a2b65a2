//! Scoring service - the immutable object every handler shares
//!
//! Built once at startup from the loaded artifact; holds the explainer
//! chosen for the model family and the default margin.

use crate::artifact::LoadedArtifact;
use crate::explain::{random_sample, Attribution, ExplainError, Explainer};
use crate::scoring::{self, feature_vector, Applicant, ScoringError, ScoringResult};

/// Explainer settings taken from configuration
#[derive(Debug, Clone, Copy)]
pub struct ExplainSettings {
    pub permutations: usize,
    pub seed: Option<u64>,
}

#[derive(Debug)]
pub struct ScoringService {
    loaded: LoadedArtifact,
    explainer: Explainer,
    default_margin: f64,
}

impl ScoringService {
    pub fn new(loaded: LoadedArtifact, default_margin: f64, settings: ExplainSettings) -> Self {
        let explainer = Explainer::for_artifact(&loaded.artifact, settings.permutations, settings.seed);
        tracing::info!(
            "Scoring service ready: explainer={:?}, default margin={}",
            explainer.kind(),
            default_margin
        );

        Self {
            loaded,
            explainer,
            default_margin,
        }
    }

    pub fn artifact(&self) -> &LoadedArtifact {
        &self.loaded
    }

    pub fn features(&self) -> &[String] {
        &self.loaded.artifact.features
    }

    pub fn threshold(&self) -> f64 {
        self.loaded.artifact.optimal_threshold
    }

    pub fn default_margin(&self) -> f64 {
        self.default_margin
    }

    pub fn explainer(&self) -> &Explainer {
        &self.explainer
    }

    /// Score one applicant; `None` uses the configured margin
    pub fn score(&self, applicant: &Applicant, margin: Option<f64>) -> Result<ScoringResult, ScoringError> {
        let margin = margin.unwrap_or(self.default_margin);
        let result = scoring::score(&self.loaded.artifact, applicant, margin)?;

        tracing::debug!(
            "Scored applicant: p={:.4}, verdict={}, band=[{:.3}, {:.3}]",
            result.probability_risky,
            result.verdict,
            result.band.lower,
            result.band.upper
        );
        Ok(result)
    }

    /// Explain the given applicant
    pub fn explain_applicant(&self, applicant: &Applicant) -> Result<Attribution, ExplainError> {
        let x = feature_vector(self.features(), applicant)?;
        self.explainer.explain(&self.loaded.artifact.model, x.view())
    }

    /// Explain a freshly drawn synthetic sample. Non-deterministic: every
    /// call draws new values.
    pub fn explain_random(&self) -> Result<Attribution, ExplainError> {
        let x = random_sample(self.features().len(), &mut rand::thread_rng());
        self.explainer.explain(&self.loaded.artifact.model, x.view())
    }
}
