//! Descriptive endpoints

use axum::{extract::State, Json};

use crate::models::ModelInfoResponse;
use crate::scoring::{MAX_MARGIN, MIN_MARGIN};
use crate::AppState;

pub const ROOT_TEXT: &str = "Credit risk scoring API. \
POST /predict scores an applicant (optional ?margin= grey zone, 0 to 0.10); \
GET /shap_values explains a random sample, POST /shap_values explains the given applicant; \
GET /model_info lists the expected features.";

pub async fn root() -> &'static str {
    ROOT_TEXT
}

pub async fn model_info(State(state): State<AppState>) -> Json<ModelInfoResponse> {
    let service = &state.service;
    let loaded = service.artifact();

    Json(ModelInfoResponse {
        features: service.features().to_vec(),
        optimal_threshold: service.threshold(),
        default_margin: service.default_margin(),
        min_margin: MIN_MARGIN,
        max_margin: MAX_MARGIN,
        model_family: loaded.artifact.model.name().to_string(),
        explainer: service.explainer().kind(),
        loaded_at: loaded.loaded_at,
    })
}
