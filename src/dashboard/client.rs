//! Scoring API client
//!
//! HTTP client the dashboard uses to talk to the scoring server.

use std::time::Duration;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::models::{ModelInfoResponse, PredictionResponse, ShapValuesResponse};
use crate::scoring::Applicant;

/// Default server address, matching the server's default bind
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(String),

    #[error("invalid response: {0}")]
    Parse(String),

    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_seconds: 30,
        }
    }
}

pub struct ApiClient {
    config: ApiConfig,
    http_client: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self { config, http_client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Feature layout, threshold and margin bounds
    pub async fn model_info(&self) -> Result<ModelInfoResponse, ClientError> {
        let request = self.http_client.get(self.url("/model_info"));
        self.send(request).await
    }

    /// Score one applicant, optionally with an explicit margin
    pub async fn predict(&self, applicant: &Applicant, margin: Option<f64>) -> Result<PredictionResponse, ClientError> {
        let mut request = self.http_client.post(self.url("/predict")).json(applicant);
        if let Some(margin) = margin {
            request = request.query(&[("margin", margin)]);
        }
        self.send(request).await
    }

    /// Attribution for the given applicant
    pub async fn explain(&self, applicant: &Applicant) -> Result<ShapValuesResponse, ClientError> {
        let request = self.http_client.post(self.url("/shap_values")).json(applicant);
        self.send(request).await
    }

    /// Attribution for a server-drawn random sample
    pub async fn explain_random(&self) -> Result<ShapValuesResponse, ClientError> {
        let request = self.http_client.get(self.url("/shap_values"));
        self.send(request).await
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T, ClientError> {
        let response = request
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            response.json().await.map_err(|e| ClientError::Parse(e.to_string()))
        } else {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
                .unwrap_or(body);
            tracing::error!("API request failed ({}): {}", status.as_u16(), message);
            Err(ClientError::Server {
                status: status.as_u16(),
                message,
            })
        }
    }
}
