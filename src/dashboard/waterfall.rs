//! Waterfall layout of an attribution
//!
//! Keeps the `max_display - 1` largest contributions and folds the rest into
//! one "N other features" row. Rows are stacked from the base value so the
//! last bar ends at the model output.

use serde::Serialize;

/// Default number of rows, the aggregated one included
pub const DEFAULT_MAX_DISPLAY: usize = 11;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterfallRow {
    pub label: String,
    /// Applicant value, absent on the aggregated row
    pub feature_value: Option<f64>,
    pub contribution: f64,
    pub start: f64,
    pub end: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Waterfall {
    pub base_value: f64,
    pub output: f64,
    /// Largest contribution first
    pub rows: Vec<WaterfallRow>,
}

impl Waterfall {
    pub fn build(values: &[f64], names: &[String], sample: &[f64], base_value: f64, max_display: usize) -> Self {
        let mut order: Vec<usize> = (0..values.len()).collect();
        order.sort_by(|&a, &b| values[b].abs().total_cmp(&values[a].abs()));

        let max_display = max_display.max(1);
        let shown = if order.len() > max_display {
            max_display - 1
        } else {
            order.len()
        };

        let mut rows: Vec<WaterfallRow> = order[..shown]
            .iter()
            .map(|&i| WaterfallRow {
                label: names.get(i).cloned().unwrap_or_else(|| format!("Feature {}", i)),
                feature_value: sample.get(i).copied(),
                contribution: values[i],
                start: 0.0,
                end: 0.0,
            })
            .collect();

        let rest = &order[shown..];
        if !rest.is_empty() {
            rows.push(WaterfallRow {
                label: format!("{} other features", rest.len()),
                feature_value: None,
                contribution: rest.iter().map(|&i| values[i]).sum(),
                start: 0.0,
                end: 0.0,
            });
        }

        // Stack from the bottom row (aggregate, then smallest) up to the largest
        let mut position = base_value;
        for row in rows.iter_mut().rev() {
            row.start = position;
            position += row.contribution;
            row.end = position;
        }

        Self {
            base_value,
            output: position,
            rows,
        }
    }
}
