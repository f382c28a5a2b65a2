//! Drift Module - reference vs current feature distributions

pub mod report;
pub mod stats;

pub use report::{default_report_name, ColumnDrift, DriftMethod, DriftOptions, DriftReport, CURRENT_LABEL, REFERENCE_LABEL};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriftError {
    #[error("reference and current datasets share no feature column")]
    NoCommonColumns,

    #[error("failed to write {path}: {source}")]
    Io { path: String, #[source] source: std::io::Error },

    #[error("serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}
