//! # PowerOwl
//!
//! `power_owl` bundles the energy analytics crates behind one dependency.
//!
//! - [`math`]: statistics, least-squares fitting and rounding (`energy_math`)
//! - [`forecast`]: forecasting, trend, anomaly detection and the prediction
//!   report (`energy_forecast`)
//!
//! ## Example
//!
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//! use power_owl::{generate_predictions, Observation, PredictionOptions, TrendDirection};
//!
//! let start = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
//! let history: Vec<Observation> = (0..10)
//!     .map(|i| Observation::new(start + Duration::days(i), 1000.0 + 50.0 * i as f64))
//!     .collect();
//!
//! let report = generate_predictions(&history, &PredictionOptions::default(), start)
//!     .into_result()
//!     .unwrap();
//! assert_eq!(report.trend.slope, 50.0);
//! assert_eq!(report.trend.direction, TrendDirection::Increasing);
//! ```

pub use energy_forecast as forecast;
pub use energy_math as math;

pub use energy_forecast::{
    accuracy, detect_anomalies, generate_predictions, generate_predictions_from_records,
    linear_trend, try_generate_predictions, AnomalyMethod, ForecastError, Observation,
    PredictionOptions, PredictionOutcome, PredictionResult, ReadingRecord, TrendDirection,
};

/// Version of the bundled analytics crates
pub const VERSION: &str = energy_forecast::VERSION;
