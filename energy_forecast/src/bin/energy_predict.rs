//! # energy_predict
//!
//! Prints the prediction report for a file of consumption records as JSON.

use anyhow::{bail, Context};
use chrono::Utc;
use clap::Parser;
use energy_forecast::config::AnalyticsConfig;
use energy_forecast::data::{
    aggregate_readings, load_records_csv, load_records_json, normalize_records, parse_timestamp,
    Granularity,
};
use energy_forecast::{generate_predictions, AnomalyMethod};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "energy_predict")]
#[command(about = "Forecast energy consumption and flag anomalies", long_about = None)]
struct Cli {
    /// Input file (CSV with a header row, or a JSON array)
    #[arg(short, long)]
    input: PathBuf,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Forecast horizon in days
    #[arg(short, long)]
    days: Option<usize>,

    /// z-score threshold for anomalies
    #[arg(short, long)]
    threshold: Option<f64>,

    /// Detection method (zscore, iqr)
    #[arg(short, long)]
    method: Option<AnomalyMethod>,

    /// Sum raw readings into buckets first (daily, hourly)
    #[arg(short, long)]
    aggregate: Option<Granularity>,

    /// Reference time for recency windows and the peak day (RFC 3339)
    #[arg(long)]
    now: Option<String>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn read_records(path: &Path) -> anyhow::Result<Vec<energy_forecast::ReadingRecord>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    let records = match extension.as_deref() {
        Some("csv") => load_records_csv(path),
        Some("json") => load_records_json(path),
        _ => bail!("unsupported input format: {}", path.display()),
    };
    records.with_context(|| format!("failed to read {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| cli.log_level.as_str().into()))
        .init();

    let mut options = AnalyticsConfig::load(cli.config.as_deref())
        .context("invalid configuration")?
        .prediction_options();
    if let Some(days) = cli.days {
        options.forecast_days = days;
    }
    if let Some(threshold) = cli.threshold {
        options.anomaly_threshold = threshold;
    }
    if let Some(method) = cli.method {
        options.anomaly_method = method;
    }
    options.validate()?;

    let now = match cli.now.as_deref() {
        Some(raw) => parse_timestamp(raw)?,
        None => Utc::now(),
    };

    let records = read_records(&cli.input)?;
    let mut history = normalize_records(&records)?;
    if let Some(granularity) = cli.aggregate {
        history = aggregate_readings(&history, granularity);
    }
    info!(
        records = records.len(),
        observations = history.len(),
        "loaded history"
    );

    let outcome = generate_predictions(&history, &options, now);
    let json = serde_json::to_string_pretty(&outcome)?;

    match cli.output {
        Some(path) => std::fs::write(&path, json)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{}", json),
    }
    Ok(())
}
