#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use credit_risk_api::artifact::{LoadedArtifact, ScoringArtifact};
use credit_risk_api::model::{LogisticModel, ModelFamily, Node, Tree, TreeEnsemble};
use credit_risk_api::{create_router, AppState, Config, ScoringService};

pub fn features() -> Vec<String> {
    vec!["A".to_string(), "B".to_string()]
}

fn split(feature: usize, threshold: f64, left: f64, left_cover: f64, right: f64, right_cover: f64) -> Tree {
    Tree {
        nodes: vec![
            Node::Split {
                feature,
                threshold,
                left: 1,
                right: 2,
                default_left: true,
                cover: left_cover + right_cover,
            },
            Node::Leaf { value: left, cover: left_cover },
            Node::Leaf { value: right, cover: right_cover },
        ],
    }
}

/// Two stumps: A <= 0.5 -> -1 / 2, B <= 100 -> 0.5 / -0.5
pub fn tree_artifact() -> ScoringArtifact {
    ScoringArtifact {
        model: ModelFamily::GradientBoosting(TreeEnsemble {
            base_score: 0.0,
            trees: vec![split(0, 0.5, -1.0, 6.0, 2.0, 4.0), split(1, 100.0, 0.5, 5.0, -0.5, 5.0)],
        }),
        features: features(),
        optimal_threshold: 0.4,
        background: None,
    }
}

/// Constant raw score, whatever the applicant
pub fn constant_artifact(margin: f64, threshold: f64) -> ScoringArtifact {
    ScoringArtifact {
        model: ModelFamily::GradientBoosting(TreeEnsemble {
            base_score: 0.0,
            trees: vec![Tree::constant(margin)],
        }),
        features: features(),
        optimal_threshold: threshold,
        background: None,
    }
}

pub fn logistic_artifact() -> ScoringArtifact {
    ScoringArtifact {
        model: ModelFamily::Logistic(LogisticModel {
            coefficients: vec![0.8, -0.3],
            intercept: -0.2,
        }),
        features: features(),
        optimal_threshold: 0.5,
        background: Some(vec![0.5, 1.0]),
    }
}

pub fn app_with_config(artifact: ScoringArtifact, config: Config) -> Router {
    let loaded = LoadedArtifact::from_artifact(artifact).unwrap();
    let service = ScoringService::new(loaded, config.default_margin, config.explain_settings());
    create_router(AppState::new(service, config))
}

pub fn app(artifact: ScoringArtifact) -> Router {
    let config = Config {
        explain_seed: Some(7),
        ..Config::default()
    };
    app_with_config(artifact, config)
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn send_raw(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, bytes) = send_raw(app, request).await;
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}
