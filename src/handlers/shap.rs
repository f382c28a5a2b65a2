//! Attribution handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::models::ShapValuesResponse;
use crate::scoring::Applicant;
use crate::{AppError, AppResult, AppState};

/// Explain a synthetic random sample (each call draws a new one)
pub async fn random_sample(State(state): State<AppState>) -> AppResult<Json<ShapValuesResponse>> {
    let expose = state.config.expose_error_details;

    let attribution = state
        .service
        .explain_random()
        .map_err(|e| AppError::from_explain(e, expose))?;

    Ok(Json(ShapValuesResponse::new(attribution, state.service.features())))
}

/// Explain the posted applicant
pub async fn applicant(
    State(state): State<AppState>,
    payload: Result<Json<Applicant>, JsonRejection>,
) -> AppResult<Json<ShapValuesResponse>> {
    let expose = state.config.expose_error_details;
    let Json(applicant) = payload.map_err(|e| AppError::internal(e.body_text(), expose))?;

    let attribution = state
        .service
        .explain_applicant(&applicant)
        .map_err(|e| AppError::from_explain(e, expose))?;

    tracing::debug!(
        "Explained applicant with {:?}: output={:.4}",
        attribution.method,
        attribution.output()
    );

    Ok(Json(ShapValuesResponse::new(attribution, state.service.features())))
}
