//! Threshold Band Classification
//!
//! Maps a risk probability to a verdict using a symmetric grey zone around
//! the optimal threshold. Shared by the scoring endpoint and the dashboard,
//! which recomputes the verdict locally with its own margin.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest accepted margin
pub const MIN_MARGIN: f64 = 0.0;

/// Largest accepted margin
pub const MAX_MARGIN: f64 = 0.10;

/// Margin slider step used by the dashboard
pub const MARGIN_STEP: f64 = 0.01;

/// Three-valued classification outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "Classe_0 (fiable)")]
    Reliable,
    #[serde(rename = "Classe_1 (risqué)")]
    Risky,
    #[serde(rename = "Zone grise (incertain)")]
    Uncertain,
}

impl Verdict {
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Reliable => "Classe_0 (fiable)",
            Verdict::Risky => "Classe_1 (risqué)",
            Verdict::Uncertain => "Zone grise (incertain)",
        }
    }

    /// Position on the reliable → risky axis
    fn rank(&self) -> u8 {
        match self {
            Verdict::Reliable => 0,
            Verdict::Uncertain => 1,
            Verdict::Risky => 2,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl PartialOrd for Verdict {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Verdict {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum MarginError {
    #[error("margin must be within [{min}, {max}], got {value}")]
    OutOfRange { value: f64, min: f64, max: f64 },
}

/// Validate a grey-zone margin
pub fn check_margin(value: f64) -> Result<f64, MarginError> {
    if value.is_finite() && (MIN_MARGIN..=MAX_MARGIN).contains(&value) {
        Ok(value)
    } else {
        Err(MarginError::OutOfRange { value, min: MIN_MARGIN, max: MAX_MARGIN })
    }
}

/// Decision band `[threshold - margin, threshold + margin]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdBand {
    pub threshold: f64,
    pub margin: f64,
    pub lower: f64,
    pub upper: f64,
}

impl ThresholdBand {
    pub fn new(threshold: f64, margin: f64) -> Self {
        Self {
            threshold,
            margin,
            lower: threshold - margin,
            upper: threshold + margin,
        }
    }

    /// Both bounds are inclusive to the grey zone
    pub fn classify(&self, probability: f64) -> Verdict {
        if probability < self.lower {
            Verdict::Reliable
        } else if probability > self.upper {
            Verdict::Risky
        } else {
            Verdict::Uncertain
        }
    }
}

pub fn classify(probability: f64, threshold: f64, margin: f64) -> Verdict {
    ThresholdBand::new(threshold, margin).classify(probability)
}
