//! Column-by-column drift report between a reference and a current dataset

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::stats::{ks_test, sorted_finite, std_dev, wasserstein};
use super::DriftError;
use crate::dashboard::Dataset;

pub const REFERENCE_LABEL: &str = "Reference Distribution (app. train features data set)";
pub const CURRENT_LABEL: &str = "Current Distribution (app. test features data set)";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriftOptions {
    /// Columns excluded from the comparison
    pub id_columns: Vec<String>,
    /// Largest reference size tested with Kolmogorov-Smirnov
    pub ks_max_rows: usize,
    pub ks_p_value: f64,
    pub wasserstein_threshold: f64,
    /// Share of drifted columns flagging the whole dataset
    pub dataset_share: f64,
}

impl Default for DriftOptions {
    fn default() -> Self {
        Self {
            id_columns: vec!["SK_ID_CURR".to_string()],
            ks_max_rows: 1000,
            ks_p_value: 0.05,
            wasserstein_threshold: 0.1,
            dataset_share: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftMethod {
    KolmogorovSmirnov,
    WassersteinNormed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDrift {
    pub column: String,
    pub method: DriftMethod,
    /// p-value for KS, normalised distance for Wasserstein
    pub score: f64,
    pub threshold: f64,
    pub drift_detected: bool,
    pub reference_count: usize,
    pub current_count: usize,
    pub reference_mean: f64,
    pub current_mean: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriftReport {
    pub reference_label: String,
    pub current_label: String,
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub reference_rows: usize,
    pub current_rows: usize,
    pub columns: Vec<ColumnDrift>,
    pub drifted_columns: usize,
    pub drift_share: f64,
    pub dataset_drift: bool,
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        f64::NAN
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn column_drift(name: &str, reference: &[f64], current: &[f64], options: &DriftOptions) -> ColumnDrift {
    let (method, score, threshold, drift_detected) = if reference.len() <= options.ks_max_rows {
        let test = ks_test(reference, current);
        (
            DriftMethod::KolmogorovSmirnov,
            test.p_value,
            options.ks_p_value,
            test.p_value < options.ks_p_value,
        )
    } else {
        let norm = std_dev(reference).max(0.001);
        let distance = wasserstein(reference, current) / norm;
        (
            DriftMethod::WassersteinNormed,
            distance,
            options.wasserstein_threshold,
            distance >= options.wasserstein_threshold,
        )
    };

    ColumnDrift {
        column: name.to_string(),
        method,
        score,
        threshold,
        drift_detected,
        reference_count: reference.len(),
        current_count: current.len(),
        reference_mean: mean(reference),
        current_mean: mean(current),
    }
}

impl DriftReport {
    pub fn compare(reference: &Dataset, current: &Dataset, options: &DriftOptions) -> Result<Self, DriftError> {
        let reference = reference.drop_columns(&options.id_columns);
        let common: Vec<String> = reference
            .columns()
            .iter()
            .filter(|c| current.column_index(c).is_some())
            .cloned()
            .collect();
        if common.is_empty() {
            return Err(DriftError::NoCommonColumns);
        }

        let columns: Vec<ColumnDrift> = common
            .iter()
            .filter_map(|name| {
                let ref_values = sorted_finite(&reference.column(name)?.to_vec());
                let cur_values = sorted_finite(&current.column(name)?.to_vec());
                if ref_values.is_empty() || cur_values.is_empty() {
                    tracing::warn!("Column {} has no values on one side, skipped", name);
                    return None;
                }
                Some(column_drift(name, &ref_values, &cur_values, options))
            })
            .collect();

        let drifted_columns = columns.iter().filter(|c| c.drift_detected).count();
        let drift_share = if columns.is_empty() {
            0.0
        } else {
            drifted_columns as f64 / columns.len() as f64
        };

        Ok(Self {
            reference_label: REFERENCE_LABEL.to_string(),
            current_label: CURRENT_LABEL.to_string(),
            generated_at: chrono::Utc::now(),
            reference_rows: reference.n_rows(),
            current_rows: current.n_rows(),
            drifted_columns,
            drift_share,
            dataset_drift: !columns.is_empty() && drift_share >= options.dataset_share,
            columns,
        })
    }

    /// Write as pretty JSON, creating parent directories
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), DriftError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| DriftError::Io {
                path: parent.display().to_string(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| DriftError::Io {
            path: path.display().to_string(),
            source,
        })?;
        tracing::info!("Drift report written to {}", path.display());
        Ok(())
    }
}

/// `<NOM>_<PRENOM>_data_drift_report.json`
pub fn default_report_name(nom: &str, prenom: &str) -> String {
    format!("{}_{}_data_drift_report.json", nom, prenom)
}
