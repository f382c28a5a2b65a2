//! Configuration module

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use crate::explain::DEFAULT_PERMUTATIONS;
use crate::scoring::{check_margin, MarginError};
use crate::service::ExplainSettings;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Scoring artifact (JSON) loaded at startup
    pub artifact_path: PathBuf,

    /// Bind address
    pub host: IpAddr,

    /// Server port
    pub port: u16,

    /// Grey-zone margin applied when a request does not set one
    pub default_margin: f64,

    /// Orderings sampled by the permutation explainer
    pub explain_permutations: usize,

    /// Fixed RNG seed for the permutation explainer
    pub explain_seed: Option<u64>,

    /// Return raw internal error messages to clients
    pub expose_error_details: bool,

    /// Environment (development, production)
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            artifact_path: PathBuf::from("models/credit_model.json"),
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 5000,
            default_margin: 0.0,
            explain_permutations: DEFAULT_PERMUTATIONS,
            explain_seed: None,
            expose_error_details: true,
            environment: "development".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            artifact_path: env::var("ARTIFACT_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.artifact_path),

            host: env::var("HOST")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(defaults.host),

            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),

            default_margin: env::var("DEFAULT_MARGIN")
                .ok()
                .and_then(|m| m.parse().ok())
                .unwrap_or(defaults.default_margin),

            explain_permutations: env::var("EXPLAIN_PERMUTATIONS")
                .ok()
                .and_then(|n| n.parse().ok())
                .unwrap_or(defaults.explain_permutations),

            explain_seed: env::var("EXPLAIN_SEED").ok().and_then(|s| s.parse().ok()),

            expose_error_details: env::var("EXPOSE_ERROR_DETAILS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.expose_error_details),

            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),
        }
    }

    /// Reject settings the server cannot start with
    pub fn validate(&self) -> Result<(), MarginError> {
        check_margin(self.default_margin)?;
        Ok(())
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn explain_settings(&self) -> ExplainSettings {
        ExplainSettings {
            permutations: self.explain_permutations,
            seed: self.explain_seed,
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
