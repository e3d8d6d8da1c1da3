//! # Energy Forecast
//!
//! Predictive analytics for energy consumption histories.
//!
//! ## Features
//!
//! - Record normalization for loosely shaped readings (CSV or JSON)
//! - Forecasting models (Holt-Winters multiplicative, simple exponential smoothing)
//! - Confidence bands from in-sample one-step errors
//! - Least-squares trend with a stable band
//! - Anomaly detection (z-score, IQR)
//! - Holdout accuracy (MAPE) and day-of-week patterns
//! - A single report combining all of the above
//!
//! Every entry point is a pure function of its inputs. The current time is
//! passed in rather than read from the clock.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::{Duration, TimeZone, Utc};
//! use energy_forecast::{generate_predictions, Observation, PredictionOptions};
//!
//! let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
//! let history: Vec<Observation> = (0..30)
//!     .map(|i| Observation::new(start + Duration::days(i), 10_000.0 + (i % 7) as f64 * 100.0))
//!     .collect();
//!
//! let now = start + Duration::days(30);
//! let outcome = generate_predictions(&history, &PredictionOptions::default(), now);
//! let report = outcome.predictions().unwrap();
//! assert_eq!(report.forecast_series.values.len(), 7);
//! ```

pub mod anomaly;
pub mod config;
pub mod data;
pub mod error;
pub mod metrics;
pub mod models;
pub mod patterns;
pub mod predictions;
pub mod trend;
pub mod utils;

// Re-export commonly used types
pub use crate::anomaly::{detect_anomalies, Anomaly, AnomalyMethod, Severity};
pub use crate::data::{Granularity, Observation, ReadingRecord};
pub use crate::error::{ForecastError, Result};
pub use crate::metrics::{accuracy, AccuracyLabel, AccuracyScore};
pub use crate::models::{forecast, ForecastModel, ForecastOutput, ForecastPoint, ModelParams};
pub use crate::predictions::{
    generate_predictions, generate_predictions_from_records, try_generate_predictions,
    PredictionOptions, PredictionOutcome, PredictionResult, RecencyAnchor,
};
pub use crate::trend::{linear_trend, TrendDirection, TrendLine};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
