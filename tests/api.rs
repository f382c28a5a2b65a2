mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::*;
use credit_risk_api::Config;

#[tokio::test]
async fn test_predict_returns_complementary_probabilities() {
    let app = app(tree_artifact());
    let (status, body) = send(&app, post_json("/predict", &json!({"A": 1.0, "B": 50}))).await;

    assert_eq!(status, StatusCode::OK);
    let p1 = body["probability_class_1"].as_f64().unwrap();
    let p0 = body["probability_class_0"].as_f64().unwrap();
    assert!((p0 + p1 - 1.0).abs() < 1e-12);
    // Raw score 2.0 + 0.5
    assert!((p1 - 1.0 / (1.0 + (-2.5f64).exp())).abs() < 1e-12);
    assert_eq!(body["optimal_threshold"], json!(0.4));
    assert_eq!(body["prediction"], "Classe_1 (risqué)");
}

#[tokio::test]
async fn test_risky_applicant_above_threshold() {
    let app = app(constant_artifact(9f64.ln(), 0.4));
    let (status, body) = send(&app, post_json("/predict", &json!({"A": 1.2, "B": 3.4}))).await;

    assert_eq!(status, StatusCode::OK);
    assert!((body["probability_class_1"].as_f64().unwrap() - 0.9).abs() < 1e-9);
    assert!((body["probability_class_0"].as_f64().unwrap() - 0.1).abs() < 1e-9);
    assert_eq!(body["prediction"], "Classe_1 (risqué)");
}

#[tokio::test]
async fn test_margin_moves_verdict_into_grey_zone() {
    // p = 0.42 against threshold 0.4
    let margin = (0.42f64 / 0.58).ln();
    let app = app(constant_artifact(margin, 0.4));
    let applicant = json!({"A": 0, "B": 0});

    let (_, body) = send(&app, post_json("/predict", &applicant)).await;
    assert_eq!(body["prediction"], "Classe_1 (risqué)");

    let (status, body) = send(&app, post_json("/predict?margin=0.05", &applicant)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prediction"], "Zone grise (incertain)");
    assert_eq!(body["margin"], json!(0.05));
    assert!((body["lower_bound"].as_f64().unwrap() - 0.35).abs() < 1e-12);
    assert!((body["upper_bound"].as_f64().unwrap() - 0.45).abs() < 1e-12);
}

#[tokio::test]
async fn test_missing_features_rejected() {
    let app = app(tree_artifact());
    let (status, body) = send(&app, post_json("/predict", &json!({"A": 1.0, "C": 2.0}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["missing_features"], json!(["B"]));
    assert_eq!(body["error"], "Missing features: B");
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn test_invalid_margin_rejected() {
    let app = app(tree_artifact());
    let applicant = json!({"A": 1.0, "B": 2.0});

    let (status, _) = send(&app, post_json("/predict?margin=0.5", &applicant)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, post_json("/predict?margin=wide", &applicant)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    for margin in ["NaN", "inf", "-inf"] {
        let (status, body) = send(&app, post_json(&format!("/predict?margin={}", margin), &applicant)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "margin={}", margin);
        assert_eq!(body["status"], 400);
    }
}

#[tokio::test]
async fn test_non_numeric_value_is_server_error() {
    let app = app(tree_artifact());
    let (status, body) = send(&app, post_json("/predict", &json!({"A": "abc", "B": 2.0}))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("'A'"));
}

#[tokio::test]
async fn test_internal_details_hidden_when_disabled() {
    let config = Config {
        expose_error_details: false,
        ..Config::default()
    };
    let app = app_with_config(tree_artifact(), config);
    let (status, body) = send(&app, post_json("/predict", &json!({"A": [1], "B": 2.0}))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");
}

#[tokio::test]
async fn test_null_value_follows_default_branch() {
    let app = app(tree_artifact());
    // A missing-valued goes left (-1.0), B <= 100 (0.5)
    let (status, body) = send(&app, post_json("/predict", &json!({"A": null, "B": 50}))).await;

    assert_eq!(status, StatusCode::OK);
    let p1 = body["probability_class_1"].as_f64().unwrap();
    assert!((p1 - 1.0 / (1.0 + 0.5f64.exp())).abs() < 1e-12);
}

#[tokio::test]
async fn test_random_shap_values_shapes() {
    let app = app(tree_artifact());
    let (status, first) = send(&app, get("/shap_values")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["features_names"], json!(["A", "B"]));
    assert_eq!(first["shap_values"].as_array().unwrap().len(), 2);
    assert_eq!(first["sample_values"].as_array().unwrap().len(), 2);
    assert!((first["base_values"].as_f64().unwrap() - 0.2).abs() < 1e-12);
    assert_eq!(first["explainer"], "tree");
    for v in first["sample_values"].as_array().unwrap() {
        let v = v.as_f64().unwrap();
        assert!((0.0..1.0).contains(&v));
    }

    let (_, second) = send(&app, get("/shap_values")).await;
    assert_ne!(first["sample_values"], second["sample_values"]);
}

#[tokio::test]
async fn test_applicant_shap_values_add_up_to_raw_score() {
    let app = app(tree_artifact());
    let (status, body) = send(&app, post_json("/shap_values", &json!({"A": 1.0, "B": 150.0}))).await;

    assert_eq!(status, StatusCode::OK);
    let values: Vec<f64> = body["shap_values"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_f64().unwrap())
        .collect();
    let base = body["base_values"].as_f64().unwrap();
    // 2.0 - 0.5
    assert!((base + values.iter().sum::<f64>() - 1.5).abs() < 1e-9);
    // Each stump only credits its own feature: 2.0 - 0.2 and -0.5 - 0.0
    assert!((values[0] - 1.8).abs() < 1e-9);
    assert!((values[1] + 0.5).abs() < 1e-9);
    assert_eq!(body["sample_values"], json!([1.0, 150.0]));
}

#[tokio::test]
async fn test_applicant_shap_values_missing_features() {
    let app = app(tree_artifact());
    let (status, body) = send(&app, post_json("/shap_values", &json!({"B": 1.0}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["missing_features"], json!(["A"]));
}

#[tokio::test]
async fn test_permutation_explainer_for_linear_model() {
    let app = app(logistic_artifact());
    let applicant = json!({"A": 2.0, "B": -1.0});

    let (status, shap) = send(&app, post_json("/shap_values", &applicant)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(shap["explainer"], "permutation");

    let (_, prediction) = send(&app, post_json("/predict", &applicant)).await;
    let p1 = prediction["probability_class_1"].as_f64().unwrap();
    let total = shap["base_values"].as_f64().unwrap()
        + shap["shap_values"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_f64().unwrap())
            .sum::<f64>();
    assert!((total - p1).abs() < 1e-9);
}

#[tokio::test]
async fn test_health_and_model_info() {
    let app = app(tree_artifact());

    let (status, health) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["feature_count"], 2);
    assert_eq!(health["model_family"], "gradient_boosting");
    assert_eq!(health["artifact_sha256"].as_str().unwrap().len(), 64);

    let (status, info) = send(&app, get("/model_info")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(info["features"], json!(["A", "B"]));
    assert_eq!(info["optimal_threshold"], json!(0.4));
    assert_eq!(info["max_margin"], json!(0.1));
    assert_eq!(info["explainer"], "tree");
}

#[tokio::test]
async fn test_root_describes_endpoints() {
    let app = app(tree_artifact());
    let (status, bytes) = send_raw(&app, get("/")).await;

    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(bytes).unwrap();
    assert!(text.contains("/predict"));
    assert!(text.contains("/shap_values"));
}

#[tokio::test]
async fn test_unknown_route() {
    let app = app(tree_artifact());
    let (status, _) = send_raw(&app, get("/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
