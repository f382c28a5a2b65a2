//! Credit Risk Scoring
//!
//! Serves default-risk scores for loan applicants from a pre-trained
//! gradient-boosted tree model, explains individual scores, and ships the
//! terminal dashboard and drift report that consume the same logic.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      CREDIT RISK API                         │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌────────────┐   ┌──────────────────┐   ┌────────────────┐  │
//! │  │  Router    │──▶│  ScoringService  │──▶│  Explainer     │  │
//! │  │  (Axum)    │   │  (immutable)     │   │  Tree / Perm.  │  │
//! │  └────────────┘   └────────┬─────────┘   └────────────────┘  │
//! │                            ▼                                 │
//! │                  ┌───────────────────┐                       │
//! │                  │ Scoring artifact  │                       │
//! │                  │ model · features  │                       │
//! │                  │ · threshold       │                       │
//! │                  └───────────────────┘                       │
//! └──────────────────────────────────────────────────────────────┘
//!        ▲                                        ▲
//!        │ HTTP                                   │ CSV
//!   dashboard (bin)                        drift-report (bin)
//! ```

pub mod artifact;
pub mod config;
pub mod dashboard;
pub mod drift;
pub mod error;
pub mod explain;
pub mod handlers;
pub mod model;
pub mod models;
pub mod scoring;
pub mod service;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use config::Config;
pub use error::{AppError, AppResult};
pub use service::ScoringService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ScoringService>,
    pub config: Config,
}

impl AppState {
    pub fn new(service: ScoringService, config: Config) -> Self {
        Self {
            service: Arc::new(service),
            config,
        }
    }
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::info::root))
        .route("/health", get(handlers::health::check))
        .route("/model_info", get(handlers::info::model_info))
        .route("/predict", post(handlers::predict::predict))
        .route(
            "/shap_values",
            get(handlers::shap::random_sample).post(handlers::shap::applicant),
        )
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
