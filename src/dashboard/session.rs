//! Dashboard session state
//!
//! One session per dashboard run: the selected applicant, the grey-zone
//! margin, and the attribution fetched for the current applicant. Changing
//! the margin only recomputes the verdict; the attribution is refetched when
//! a new applicant is selected.

use uuid::Uuid;

use crate::models::{PredictionResponse, ShapValuesResponse};
use crate::scoring::{check_margin, MarginError, ThresholdBand, Verdict, MIN_MARGIN};
use crate::scoring::threshold::MARGIN_STEP;

#[derive(Debug)]
pub struct DashboardSession {
    pub id: Uuid,
    margin: f64,
    selected: Option<usize>,
    prediction: Option<PredictionResponse>,
    attribution: Option<ShapValuesResponse>,
}

impl Default for DashboardSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            margin: MIN_MARGIN,
            selected: None,
            prediction: None,
            attribution: None,
        }
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }

    /// Snap to the slider step, then bound-check
    pub fn set_margin(&mut self, margin: f64) -> Result<f64, MarginError> {
        let snapped = (margin / MARGIN_STEP).round() * MARGIN_STEP;
        // Round off the float noise of the multiplication
        let snapped = (snapped * 1e6).round() / 1e6;
        self.margin = check_margin(snapped)?;
        Ok(self.margin)
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// New applicant: previous score and attribution no longer apply
    pub fn select_applicant(&mut self, index: usize) {
        self.selected = Some(index);
        self.prediction = None;
        self.attribution = None;
    }

    pub fn prediction(&self) -> Option<&PredictionResponse> {
        self.prediction.as_ref()
    }

    pub fn set_prediction(&mut self, prediction: PredictionResponse) {
        self.prediction = Some(prediction);
    }

    pub fn attribution(&self) -> Option<&ShapValuesResponse> {
        self.attribution.as_ref()
    }

    pub fn set_attribution(&mut self, attribution: ShapValuesResponse) {
        self.attribution = Some(attribution);
    }

    /// Band for the session margin around the server's threshold
    pub fn band(&self) -> Option<ThresholdBand> {
        self.prediction
            .as_ref()
            .map(|p| ThresholdBand::new(p.optimal_threshold, self.margin))
    }

    /// Verdict recomputed with the session margin
    pub fn local_verdict(&self) -> Option<Verdict> {
        let prediction = self.prediction.as_ref()?;
        self.band().map(|band| band.classify(prediction.probability_class_1))
    }
}
