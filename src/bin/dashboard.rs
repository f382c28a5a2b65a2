//! Terminal dashboard for the Credit Risk API
//!
//! Commands: `n` new random applicant, `m <margin>` change the grey-zone
//! margin, `r` refresh the attribution, `q` quit.

use anyhow::{bail, Context};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use credit_risk_api::dashboard::{
    compare_applicant, view, ApiClient, ApiConfig, DashboardSession, Dataset, Waterfall, DEFAULT_API_URL,
    DEFAULT_MAX_DISPLAY,
};
use credit_risk_api::models::ModelInfoResponse;

#[derive(Parser)]
#[command(author, version, about = "Credit scoring dashboard", long_about = None)]
struct Args {
    /// Scoring API base URL
    #[arg(long, env = "API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Applicant CSV
    #[arg(long, env = "DATASET_PATH")]
    dataset: std::path::PathBuf,

    /// Waterfall rows, the aggregated tail included
    #[arg(long, default_value_t = DEFAULT_MAX_DISPLAY)]
    max_display: usize,

    /// Explain a server-drawn random sample instead of the applicant
    #[arg(long)]
    random_sample: bool,

    /// Seed for applicant selection
    #[arg(long)]
    seed: Option<u64>,
}

struct Dashboard {
    client: ApiClient,
    info: ModelInfoResponse,
    dataset: Dataset,
    session: DashboardSession,
    rng: StdRng,
    max_display: usize,
    random_sample: bool,
}

impl Dashboard {
    async fn next_applicant(&mut self) -> anyhow::Result<()> {
        let Some(index) = self.dataset.sample_row(&mut self.rng) else {
            bail!("dataset has no complete row");
        };
        self.session.select_applicant(index);
        println!("\n=== Applicant (row {}) ===", self.dataset.row_id(index));

        let comparison = compare_applicant(&self.dataset, index, &self.info.features)?;
        print!("{}", view::render_comparison(&comparison));

        let applicant = self.dataset.applicant(index, &self.info.features)?;
        let prediction = self
            .client
            .predict(&applicant, Some(self.session.margin()))
            .await
            .context("prediction request failed")?;
        self.session.set_prediction(prediction);
        self.show_verdict();

        self.refresh_attribution().await
    }

    fn show_verdict(&self) {
        if let (Some(prediction), Some(band), Some(verdict)) =
            (self.session.prediction(), self.session.band(), self.session.local_verdict())
        {
            println!();
            print!("{}", view::render_verdict(prediction, band, verdict));
        }
    }

    async fn refresh_attribution(&mut self) -> anyhow::Result<()> {
        let Some(index) = self.session.selected() else {
            println!("No applicant selected, press `n` first");
            return Ok(());
        };

        let attribution = if self.random_sample {
            self.client.explain_random().await
        } else {
            let applicant = self.dataset.applicant(index, &self.info.features)?;
            self.client.explain(&applicant).await
        }
        .context("attribution request failed")?;

        let waterfall = Waterfall::build(
            &attribution.shap_values,
            &attribution.features_names,
            &attribution.sample_values,
            attribution.base_values,
            self.max_display,
        );
        println!("\n=== Feature contributions ({:?}) ===", attribution.explainer);
        print!("{}", view::render_waterfall(&waterfall));
        self.session.set_attribution(attribution);
        Ok(())
    }

    fn set_margin(&mut self, raw: &str) {
        match raw.trim().parse::<f64>() {
            Ok(value) => match self.session.set_margin(value) {
                Ok(margin) => {
                    println!("Margin set to {:.2}", margin);
                    self.show_verdict();
                }
                Err(e) => println!("{}", e),
            },
            Err(_) => println!("Usage: m <margin in [{}, {}]>", self.info.min_margin, self.info.max_margin),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "credit_risk_api=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let client = ApiClient::new(ApiConfig {
        base_url: args.api_url.clone(),
        ..Default::default()
    })?;
    let info = client
        .model_info()
        .await
        .with_context(|| format!("cannot reach scoring API at {}", args.api_url))?;

    let dataset = Dataset::from_path(&args.dataset)?
        .complete_rows()
        .select_columns(&info.features)?;
    if dataset.is_empty() {
        bail!("{} has no row with every feature present", args.dataset.display());
    }

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut session = DashboardSession::new();
    if let Err(e) = session.set_margin(info.default_margin) {
        tracing::warn!("Server default margin rejected: {}", e);
    }
    tracing::info!("Dashboard session {} on {} applicants", session.id, dataset.n_rows());

    let mut dashboard = Dashboard {
        client,
        info,
        dataset,
        session,
        rng,
        max_display: args.max_display,
        random_sample: args.random_sample,
    };

    println!(
        "Credit scoring dashboard. Threshold {:.3}. Commands: n (new applicant), m <margin>, r (refresh contributions), q (quit)",
        dashboard.info.optimal_threshold
    );
    if let Err(e) = dashboard.next_applicant().await {
        println!("Error: {:#}", e);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        let result = match command {
            "n" => dashboard.next_applicant().await,
            "m" => {
                dashboard.set_margin(rest);
                Ok(())
            }
            "r" => dashboard.refresh_attribution().await,
            "q" => break,
            "" => Ok(()),
            other => {
                println!("Unknown command '{}'", other);
                Ok(())
            }
        };
        if let Err(e) = result {
            println!("Error: {:#}", e);
        }
    }

    Ok(())
}
