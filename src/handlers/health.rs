//! Health check handler

use axum::{extract::State, Json};

use crate::models::HealthResponse;
use crate::AppState;

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    let loaded = state.service.artifact();

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().timestamp(),
        model_family: loaded.artifact.model.name().to_string(),
        feature_count: loaded.artifact.feature_count(),
        artifact_sha256: loaded.sha256.clone(),
    })
}
