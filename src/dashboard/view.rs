//! Terminal rendering of dashboard panels

use std::fmt::Write;

use super::dataset::FeatureComparison;
use super::waterfall::Waterfall;
use crate::models::PredictionResponse;
use crate::scoring::{ThresholdBand, Verdict};

const BAR_WIDTH: usize = 40;

fn fmt_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.fract() == 0.0 && value.abs() < 1e12 {
        format!("{:.0}", value)
    } else {
        format!("{:.4}", value)
    }
}

/// Applicant vs population table
pub fn render_comparison(rows: &[FeatureComparison]) -> String {
    let width = rows.iter().map(|r| r.feature.len()).max().unwrap_or(7).max(7);
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{:<width$}  {:>14}  {:>14}  {:>14}  {}",
        "Feature", "Client", "Mean", "Std", "In [mean±std]",
        width = width
    );
    for row in rows {
        let _ = writeln!(
            out,
            "{:<width$}  {:>14}  {:>14}  {:>14}  {}",
            row.feature,
            fmt_value(row.client_value),
            fmt_value(row.mean),
            fmt_value(row.std),
            if row.in_interval { "yes" } else { "NO" },
            width = width
        );
    }
    out
}

/// Probability, band and verdict
pub fn render_verdict(prediction: &PredictionResponse, band: ThresholdBand, verdict: Verdict) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Risk probability : {:.2} %", prediction.probability_class_1 * 100.0);
    let _ = writeln!(
        out,
        "Threshold        : {:.3} (margin {:.2}, grey zone [{:.3}, {:.3}])",
        band.threshold, band.margin, band.lower, band.upper
    );
    let _ = writeln!(out, "Verdict          : {}", verdict);

    // Gauge: probability marker against the grey zone on [0, 1]
    let cell = |v: f64| ((v.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    let (lo, hi, at) = (cell(band.lower), cell(band.upper), cell(prediction.probability_class_1));
    let gauge: String = (0..=BAR_WIDTH)
        .map(|i| {
            if i == at {
                '▲'
            } else if i >= lo && i <= hi {
                '░'
            } else {
                '─'
            }
        })
        .collect();
    let _ = writeln!(out, "0 {} 1", gauge);
    out
}

/// Horizontal waterfall, largest contribution on top
pub fn render_waterfall(waterfall: &Waterfall) -> String {
    let mut out = String::new();
    let label_width = waterfall.rows.iter().map(|r| label(r.label.as_str(), r.feature_value).len()).max().unwrap_or(0);

    let (mut min, mut max) = (waterfall.base_value, waterfall.base_value);
    for row in &waterfall.rows {
        min = min.min(row.start.min(row.end));
        max = max.max(row.start.max(row.end));
    }
    let span = if max > min { max - min } else { 1.0 };
    let pos = |v: f64| (((v - min) / span) * BAR_WIDTH as f64).round() as usize;

    let _ = writeln!(out, "f(x) = {:.4}", waterfall.output);
    for row in &waterfall.rows {
        let (a, b) = (pos(row.start.min(row.end)), pos(row.start.max(row.end)));
        let glyph = if row.contribution >= 0.0 { '+' } else { '-' };
        let bar: String = (0..=BAR_WIDTH)
            .map(|i| if i >= a && i <= b && a != b { glyph } else if i == a { '|' } else { ' ' })
            .collect();
        let _ = writeln!(
            out,
            "{:>lw$} {} {:+.4}",
            label(&row.label, row.feature_value),
            bar,
            row.contribution,
            lw = label_width
        );
    }
    let _ = writeln!(out, "E[f(X)] = {:.4}", waterfall.base_value);
    out
}

fn label(name: &str, value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{} = {}", fmt_value(v), name),
        None => name.to_string(),
    }
}
