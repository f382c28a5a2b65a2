//! Scoring handler

use axum::{
    extract::{rejection::{JsonRejection, QueryRejection}, Query, State},
    Json,
};
use validator::Validate;

use crate::models::{PredictParams, PredictionResponse};
use crate::scoring::{check_margin, Applicant};
use crate::{AppError, AppResult, AppState};

/// Score one applicant
pub async fn predict(
    State(state): State<AppState>,
    params: Result<Query<PredictParams>, QueryRejection>,
    payload: Result<Json<Applicant>, JsonRejection>,
) -> AppResult<Json<PredictionResponse>> {
    let expose = state.config.expose_error_details;

    let Query(params) = params.map_err(|e| AppError::ValidationError(e.body_text()))?;
    params
        .validate()
        .map_err(|e| AppError::ValidationError(format!("invalid margin: {}", e)))?;
    // NaN passes the range check, so bounds are re-checked here
    let margin = params
        .margin
        .map(check_margin)
        .transpose()
        .map_err(|e| AppError::ValidationError(format!("invalid margin: {}", e)))?;

    // Unparseable bodies are reported like any other processing failure
    let Json(applicant) = payload.map_err(|e| AppError::internal(e.body_text(), expose))?;

    let result = state
        .service
        .score(&applicant, margin)
        .map_err(|e| AppError::from_scoring(e, expose))?;

    Ok(Json(result.into()))
}
