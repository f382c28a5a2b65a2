//! Scoring artifact - model, feature layout and decision threshold
//!
//! The artifact is a single JSON document with three required fields
//! (`model`, `features`, `optimal_threshold`) and an optional `background`
//! reference point for the model-agnostic explainer. It is loaded once at
//! startup and never mutated afterwards.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::model::{ModelError, ModelFamily};

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read artifact {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed artifact: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid artifact: {0}")]
    Invalid(String),

    #[error("invalid model: {0}")]
    Model(#[from] ModelError),
}

/// Serialized scoring artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringArtifact {
    pub model: ModelFamily,
    /// Ordered feature names; defines the layout of every feature vector
    pub features: Vec<String>,
    pub optimal_threshold: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Vec<f64>>,
}

impl ScoringArtifact {
    /// Parse and validate an artifact from raw JSON bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ArtifactError> {
        let artifact: ScoringArtifact = serde_json::from_slice(bytes)?;
        artifact.validate()?;
        Ok(artifact)
    }

    pub fn validate(&self) -> Result<(), ArtifactError> {
        if self.features.is_empty() {
            return Err(ArtifactError::Invalid("feature list is empty".to_string()));
        }

        let mut seen = HashSet::with_capacity(self.features.len());
        for name in &self.features {
            if !seen.insert(name.as_str()) {
                return Err(ArtifactError::Invalid(format!("duplicate feature name '{}'", name)));
            }
        }

        if !self.optimal_threshold.is_finite() || !(0.0..=1.0).contains(&self.optimal_threshold) {
            return Err(ArtifactError::Invalid(format!(
                "optimal_threshold must be within [0, 1], got {}",
                self.optimal_threshold
            )));
        }

        if let Some(background) = &self.background {
            if background.len() != self.features.len() {
                return Err(ArtifactError::Invalid(format!(
                    "background has {} values for {} features",
                    background.len(),
                    self.features.len()
                )));
            }
        }

        self.model.validate(self.features.len())?;
        Ok(())
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    /// Reference point for the permutation explainer (zero vector by default)
    pub fn background(&self) -> Array1<f64> {
        match &self.background {
            Some(values) => Array1::from_vec(values.clone()),
            None => Array1::zeros(self.features.len()),
        }
    }
}

/// Artifact plus load metadata
#[derive(Debug, Clone)]
pub struct LoadedArtifact {
    pub artifact: ScoringArtifact,
    pub path: PathBuf,
    /// Hex SHA-256 of the artifact bytes
    pub sha256: String,
    pub loaded_at: DateTime<Utc>,
}

impl LoadedArtifact {
    /// Load artifact from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        tracing::info!("Loading scoring artifact from: {}", path.display());

        if !path.exists() {
            return Err(ArtifactError::NotFound(path.to_path_buf()));
        }

        let bytes = fs::read(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let artifact = ScoringArtifact::from_slice(&bytes)?;
        let sha256 = hex::encode(Sha256::digest(&bytes));

        tracing::info!(
            "Artifact loaded: family={}, features={}, threshold={:.3}, sha256={}",
            artifact.model.name(),
            artifact.feature_count(),
            artifact.optimal_threshold,
            &sha256[..12]
        );

        Ok(Self {
            artifact,
            path: path.to_path_buf(),
            sha256,
            loaded_at: Utc::now(),
        })
    }

    /// Wrap an in-memory artifact (fingerprint taken over its JSON form)
    pub fn from_artifact(artifact: ScoringArtifact) -> Result<Self, ArtifactError> {
        artifact.validate()?;
        let bytes = serde_json::to_vec(&artifact)?;
        Ok(Self {
            artifact,
            path: PathBuf::from("<memory>"),
            sha256: hex::encode(Sha256::digest(&bytes)),
            loaded_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const VALID: &str = r#"{
        "model": {"family": "logistic", "coefficients": [0.5, -0.25], "intercept": 0.1},
        "features": ["A", "B"],
        "optimal_threshold": 0.4
    }"#;

    #[test]
    fn test_parse_valid_artifact() {
        let artifact = ScoringArtifact::from_slice(VALID.as_bytes()).unwrap();
        assert_eq!(artifact.features, vec!["A", "B"]);
        assert_eq!(artifact.optimal_threshold, 0.4);
        assert_eq!(artifact.background().to_vec(), vec![0.0, 0.0]);
    }

    #[test]
    fn test_missing_threshold_is_malformed() {
        let json = r#"{"model": {"family": "logistic", "coefficients": [1.0]}, "features": ["A"]}"#;
        let err = ScoringArtifact::from_slice(json.as_bytes()).unwrap_err();
        assert!(matches!(err, ArtifactError::Malformed(_)));
        assert!(err.to_string().contains("optimal_threshold"));
    }

    #[test]
    fn test_threshold_out_of_range() {
        let json = VALID.replace("0.4", "1.4");
        assert!(matches!(
            ScoringArtifact::from_slice(json.as_bytes()),
            Err(ArtifactError::Invalid(_))
        ));
    }

    #[test]
    fn test_duplicate_features_rejected() {
        let json = VALID.replace(r#"["A", "B"]"#, r#"["A", "A"]"#);
        assert!(ScoringArtifact::from_slice(json.as_bytes()).is_err());
    }

    #[test]
    fn test_coefficient_count_mismatch() {
        let json = VALID.replace(r#"["A", "B"]"#, r#"["A", "B", "C"]"#);
        assert!(matches!(
            ScoringArtifact::from_slice(json.as_bytes()),
            Err(ArtifactError::Model(ModelError::CoefficientCount { expected: 3, found: 2 }))
        ));
    }

    #[test]
    fn test_load_from_file_with_fingerprint() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(VALID.as_bytes()).unwrap();

        let loaded = LoadedArtifact::load(file.path()).unwrap();
        assert_eq!(loaded.sha256.len(), 64);
        assert_eq!(loaded.sha256, hex::encode(Sha256::digest(VALID.as_bytes())));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = LoadedArtifact::load(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ArtifactError::NotFound(_)));
    }
}
