//! Error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::explain::ExplainError;
use crate::scoring::ScoringError;

pub type AppResult<T> = Result<T, AppError>;

/// Message returned when internal details are hidden
pub const GENERIC_INTERNAL_ERROR: &str = "Internal server error";

#[derive(Debug, Error)]
pub enum AppError {
    // Client errors
    #[error("Missing features: {}", .0.join(", "))]
    MissingFeatures(Vec<String>),

    #[error("{0}")]
    ValidationError(String),

    // Inference / attribution / parsing failures
    #[error("{0}")]
    InternalError(String),
}

impl AppError {
    /// Internal failure, with the raw message only when `expose` is set
    pub fn internal(err: impl std::fmt::Display, expose: bool) -> Self {
        let message = err.to_string();
        tracing::error!("Internal error: {}", message);
        if expose {
            AppError::InternalError(message)
        } else {
            AppError::InternalError(GENERIC_INTERNAL_ERROR.to_string())
        }
    }

    pub fn from_scoring(err: ScoringError, expose: bool) -> Self {
        match err {
            ScoringError::MissingFeatures(missing) => AppError::MissingFeatures(missing),
            other => Self::internal(other, expose),
        }
    }

    pub fn from_explain(err: ExplainError, expose: bool) -> Self {
        match err {
            ExplainError::Input(ScoringError::MissingFeatures(missing)) => AppError::MissingFeatures(missing),
            other => Self::internal(other, expose),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingFeatures(_) | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            AppError::MissingFeatures(missing) => {
                tracing::warn!("Rejected request, missing features: {:?}", missing);
                json!({
                    "error": self.to_string(),
                    "missing_features": missing,
                    "status": status.as_u16()
                })
            }
            _ => json!({
                "error": self.to_string(),
                "status": status.as_u16()
            }),
        };

        (status, Json(body)).into_response()
    }
}
