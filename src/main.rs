//! Credit Risk API server

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use credit_risk_api::artifact::LoadedArtifact;
use credit_risk_api::{create_router, AppState, Config, ScoringService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env first so RUST_LOG and LOG_FORMAT can come from it
    dotenvy::dotenv().ok();

    // Initialize logging (LOG_FORMAT=json for structured output)
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "credit_risk_api=debug,tower_http=debug".into()),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(tracing_subscriber::fmt::layer))
        .init();

    // Load configuration
    let config = Config::from_env();
    config.validate().context("Invalid configuration")?;

    tracing::info!("Credit Risk API starting...");
    if config.is_production() && config.expose_error_details {
        tracing::warn!("Internal error messages are returned to clients (EXPOSE_ERROR_DETAILS=true)");
    }

    // Startup fails if the artifact cannot be loaded
    let loaded = LoadedArtifact::load(&config.artifact_path).map_err(|e| {
        tracing::error!("Failed to load scoring artifact: {}", e);
        e
    })?;
    tracing::info!(
        "Optimal threshold used for classification: {:.3}",
        loaded.artifact.optimal_threshold
    );

    let service = ScoringService::new(loaded, config.default_margin, config.explain_settings());
    let addr = config.bind_addr();
    let app = create_router(AppState::new(service, config));

    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
