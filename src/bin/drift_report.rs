//! Data drift report between training and test feature sets

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use credit_risk_api::dashboard::Dataset;
use credit_risk_api::drift::{default_report_name, DriftOptions, DriftReport};

#[derive(Parser)]
#[command(author, version, about = "Feature drift report", long_about = None)]
struct Args {
    /// Reference (training) feature CSV
    #[arg(long)]
    reference: PathBuf,

    /// Current (test) feature CSV
    #[arg(long)]
    current: PathBuf,

    /// Report path; defaults to <report-dir>/<NOM>_<PRENOM>_data_drift_report.json
    #[arg(long)]
    output: Option<PathBuf>,

    #[arg(long, default_value = "reports")]
    report_dir: PathBuf,

    /// Identifier column excluded from the comparison
    #[arg(long, default_value = "SK_ID_CURR")]
    id_column: Vec<String>,

    #[arg(long, env = "NOM", default_value = "NOM")]
    nom: String,

    #[arg(long, env = "PRENOM", default_value = "PRENOM")]
    prenom: String,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "credit_risk_api=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let reference = Dataset::from_path(&args.reference)
        .with_context(|| format!("cannot load reference {}", args.reference.display()))?;
    let current = Dataset::from_path(&args.current)
        .with_context(|| format!("cannot load current {}", args.current.display()))?;

    let options = DriftOptions {
        id_columns: args.id_column,
        ..Default::default()
    };
    let report = DriftReport::compare(&reference, &current, &options)?;

    let output = args
        .output
        .unwrap_or_else(|| args.report_dir.join(default_report_name(&args.nom, &args.prenom)));
    report.write_json(&output)?;

    tracing::info!(
        "{} of {} columns drifted ({:.0}%), dataset drift: {}",
        report.drifted_columns,
        report.columns.len(),
        report.drift_share * 100.0,
        report.dataset_drift
    );
    for column in report.columns.iter().filter(|c| c.drift_detected) {
        tracing::info!("  {} ({:?}, score {:.4})", column.column, column.method, column.score);
    }

    Ok(())
}
