//! Applicant dataset loaded from CSV
//!
//! Cells are parsed as floats; empty cells and the usual NaN spellings are
//! missing values, stored as NaN.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use ndarray::{Array2, ArrayView1, Axis};
use rand::Rng;
use serde::Serialize;
use thiserror::Error;

use crate::scoring::{applicant_from_values, Applicant};

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to open {path}: {source}")]
    Io { path: String, #[source] source: std::io::Error },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("dataset has no column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("inconsistent table shape: {0}")]
    Shape(String),
}

fn parse_cell(raw: &str) -> Option<f64> {
    let cell = raw.trim();
    match cell {
        "" | "NaN" | "nan" | "NA" | "N/A" | "null" => Some(f64::NAN),
        _ => cell.parse().ok(),
    }
}

/// Numeric table, one row per applicant
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<String>,
    /// Row positions in the source file (kept through filtering)
    row_ids: Vec<usize>,
    values: Array2<f64>,
}

impl Dataset {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| DatasetError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let dataset = Self::from_reader(file)?;
        tracing::info!(
            "Loaded dataset {}: {} rows x {} columns",
            path.display(),
            dataset.n_rows(),
            dataset.columns.len()
        );
        Ok(dataset)
    }

    /// Columns holding any unparseable cell are treated as non-numeric and
    /// left out of the table
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut csv = csv::Reader::from_reader(reader);
        let headers: Vec<String> = csv.headers()?.iter().map(|h| h.trim().to_string()).collect();

        let mut numeric = vec![true; headers.len()];
        let mut flat = Vec::new();
        let mut n_rows = 0;
        for record in csv.records() {
            let record = record?;
            if record.len() != headers.len() {
                return Err(DatasetError::Shape(format!(
                    "row {} has {} fields, header has {}",
                    n_rows,
                    record.len(),
                    headers.len()
                )));
            }
            for (i, raw) in record.iter().enumerate() {
                let value = parse_cell(raw).unwrap_or_else(|| {
                    numeric[i] = false;
                    f64::NAN
                });
                flat.push(value);
            }
            n_rows += 1;
        }

        let values = Array2::from_shape_vec((n_rows, headers.len()), flat)
            .map_err(|e| DatasetError::Shape(e.to_string()))?;

        let keep: Vec<usize> = (0..headers.len()).filter(|&i| numeric[i]).collect();
        let skipped: Vec<&str> = (0..headers.len())
            .filter(|&i| !numeric[i])
            .map(|i| headers[i].as_str())
            .collect();
        if !skipped.is_empty() {
            tracing::warn!("Skipping non-numeric column(s): {}", skipped.join(", "));
        }

        Ok(Self {
            columns: keep.iter().map(|&i| headers[i].clone()).collect(),
            row_ids: (0..n_rows).collect(),
            values: values.select(Axis(1), &keep),
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows() == 0
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn column(&self, name: &str) -> Option<ArrayView1<f64>> {
        self.column_index(name).map(|i| self.values.column(i))
    }

    pub fn row(&self, index: usize) -> ArrayView1<f64> {
        self.values.row(index)
    }

    /// Source-file position of a row
    pub fn row_id(&self, index: usize) -> usize {
        self.row_ids[index]
    }

    /// Rows without any missing value
    pub fn complete_rows(&self) -> Dataset {
        let keep: Vec<usize> = self
            .values
            .axis_iter(Axis(0))
            .enumerate()
            .filter(|(_, row)| row.iter().all(|v| !v.is_nan()))
            .map(|(i, _)| i)
            .collect();

        Dataset {
            columns: self.columns.clone(),
            row_ids: keep.iter().map(|&i| self.row_ids[i]).collect(),
            values: self.values.select(Axis(0), &keep),
        }
    }

    /// Keep the named columns, in the given order
    pub fn select_columns(&self, names: &[String]) -> Result<Dataset, DatasetError> {
        let mut indices = Vec::with_capacity(names.len());
        let mut missing = Vec::new();
        for name in names {
            match self.column_index(name) {
                Some(i) => indices.push(i),
                None => missing.push(name.clone()),
            }
        }
        if !missing.is_empty() {
            return Err(DatasetError::MissingColumns(missing));
        }

        Ok(Dataset {
            columns: names.to_vec(),
            row_ids: self.row_ids.clone(),
            values: self.values.select(Axis(1), &indices),
        })
    }

    /// Drop the named columns when present
    pub fn drop_columns(&self, names: &[String]) -> Dataset {
        let keep: Vec<String> = self.columns.iter().filter(|c| !names.contains(c)).cloned().collect();
        // Every kept name exists by construction
        self.select_columns(&keep).unwrap_or_else(|_| self.clone())
    }

    /// Pick a random row index
    pub fn sample_row<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<usize> {
        if self.is_empty() {
            None
        } else {
            Some(rng.gen_range(0..self.n_rows()))
        }
    }

    /// Row as an API payload restricted to `features`
    pub fn applicant(&self, index: usize, features: &[String]) -> Result<Applicant, DatasetError> {
        let subset = self.select_columns(features)?;
        let row = subset.row(index).to_vec();
        Ok(applicant_from_values(features, &row))
    }

    /// Mean and sample standard deviation of every column
    pub fn stats(&self) -> Vec<FeatureStats> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, name)| FeatureStats::from_column(name, self.values.column(i)))
            .collect()
    }
}

/// Column summary, missing values ignored
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureStats {
    pub feature: String,
    pub mean: f64,
    /// Sample standard deviation (n - 1); NaN with fewer than two values
    pub std: f64,
    pub count: usize,
}

impl FeatureStats {
    pub fn from_column(name: &str, column: ArrayView1<f64>) -> Self {
        let present: Vec<f64> = column.iter().copied().filter(|v| !v.is_nan()).collect();
        let count = present.len();

        let mean = if count > 0 {
            present.iter().sum::<f64>() / count as f64
        } else {
            f64::NAN
        };
        let std = if count > 1 {
            (present.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64).sqrt()
        } else {
            f64::NAN
        };

        Self {
            feature: name.to_string(),
            mean,
            std,
            count,
        }
    }

    pub fn lower(&self) -> f64 {
        self.mean - self.std
    }

    pub fn upper(&self) -> f64 {
        self.mean + self.std
    }
}

/// One line of the applicant-vs-population table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureComparison {
    pub feature: String,
    pub client_value: f64,
    pub mean: f64,
    pub std: f64,
    /// Value within [mean - std, mean + std]
    pub in_interval: bool,
}

/// Compare one applicant with the population, feature by feature
pub fn compare_applicant(dataset: &Dataset, index: usize, features: &[String]) -> Result<Vec<FeatureComparison>, DatasetError> {
    let subset = dataset.select_columns(features)?;
    let row = subset.row(index);

    Ok(subset
        .stats()
        .into_iter()
        .zip(row.iter())
        .map(|(stats, &value)| FeatureComparison {
            in_interval: stats.lower() <= value && value <= stats.upper(),
            client_value: value,
            mean: stats.mean,
            std: stats.std,
            feature: stats.feature,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    const CSV: &str = "SK_ID_CURR,A,B\n\
                       1,1.0,10\n\
                       2,,20\n\
                       3,3.0,30\n\
                       4,5.0,NaN\n\
                       5,7.0,40\n";

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_with_missing_cells() {
        let dataset = Dataset::from_reader(CSV.as_bytes()).unwrap();
        assert_eq!(dataset.columns(), &names(&["SK_ID_CURR", "A", "B"])[..]);
        assert_eq!(dataset.n_rows(), 5);
        assert!(dataset.row(1)[1].is_nan());
        assert!(dataset.row(3)[2].is_nan());
    }

    #[test]
    fn test_complete_rows_keep_source_ids() {
        let complete = Dataset::from_reader(CSV.as_bytes()).unwrap().complete_rows();
        assert_eq!(complete.n_rows(), 3);
        assert_eq!((0..3).map(|i| complete.row_id(i)).collect::<Vec<_>>(), vec![0, 2, 4]);
    }

    #[test]
    fn test_sample_std_and_inclusive_interval() {
        let complete = Dataset::from_reader(CSV.as_bytes()).unwrap().complete_rows();
        let features = names(&["A", "B"]);

        // A over complete rows: 1, 3, 7 -> mean 11/3, sample std sqrt(28/3)
        let stats = complete.select_columns(&features).unwrap().stats();
        assert!((stats[0].mean - 11.0 / 3.0).abs() < 1e-12);
        assert!((stats[0].std - (28.0f64 / 3.0).sqrt()).abs() < 1e-12);

        let comparison = compare_applicant(&complete, 1, &features).unwrap();
        assert_eq!(comparison[0].client_value, 3.0);
        assert!(comparison[0].in_interval);
        // B: 10, 30, 40 -> mean 26.67, std 15.28; 10 falls outside
        let first = compare_applicant(&complete, 0, &features).unwrap();
        assert!(!first[1].in_interval);
    }

    #[test]
    fn test_interval_bounds_inclusive() {
        let stats = FeatureStats::from_column("X", ndarray::array![1.0, 3.0].view());
        assert_eq!(stats.mean, 2.0);
        assert!((stats.std - 2f64.sqrt()).abs() < 1e-12);

        // mean 1, std 1: both 0 and 2 sit exactly on the bounds
        let dataset = Dataset::from_reader("X\n0\n0\n2\n2\n1\n".as_bytes()).unwrap();
        let comparison = compare_applicant(&dataset, 0, &names(&["X"])).unwrap();
        assert_eq!(comparison[0].std, 1.0);
        assert!(comparison[0].in_interval);
        let comparison = compare_applicant(&dataset, 2, &names(&["X"])).unwrap();
        assert!(comparison[0].in_interval);
    }

    #[test]
    fn test_missing_columns_reported() {
        let dataset = Dataset::from_reader(CSV.as_bytes()).unwrap();
        match dataset.select_columns(&names(&["A", "Z", "Y"])) {
            Err(DatasetError::MissingColumns(missing)) => assert_eq!(missing, names(&["Z", "Y"])),
            other => panic!("unexpected {:?}", other.map(|d| d.columns().to_vec())),
        }
    }

    #[test]
    fn test_text_columns_skipped() {
        let dataset = Dataset::from_reader("A,CODE_GENDER,B\n1,M,2\n3,F,\n".as_bytes()).unwrap();
        assert_eq!(dataset.columns(), &names(&["A", "B"])[..]);
        assert_eq!(dataset.row(0).to_vec(), vec![1.0, 2.0]);
        assert!(dataset.row(1)[1].is_nan());
    }

    #[test]
    fn test_ragged_row_rejected() {
        let err = Dataset::from_reader("A,B\n1,2\n3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DatasetError::Csv(_) | DatasetError::Shape(_)));
    }

    #[test]
    fn test_applicant_payload_and_sampling() {
        let complete = Dataset::from_reader(CSV.as_bytes()).unwrap().complete_rows();
        let applicant = complete.applicant(2, &names(&["B", "A"])).unwrap();
        assert_eq!(applicant["A"], serde_json::json!(7.0));
        assert_eq!(applicant["B"], serde_json::json!(40.0));

        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        let index = complete.sample_row(&mut rng).unwrap();
        assert!(index < complete.n_rows());
    }

    #[test]
    fn test_drop_columns() {
        let dataset = Dataset::from_reader(CSV.as_bytes()).unwrap();
        let dropped = dataset.drop_columns(&names(&["SK_ID_CURR"]));
        assert_eq!(dropped.columns(), &names(&["A", "B"])[..]);
    }
}
