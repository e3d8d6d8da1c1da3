//! Forecasting models for consumption series
//!
//! Models are strict: training fails when a series cannot support them.
//! [`forecast`] layers the fallback policy on top so callers always get a
//! usable series back.

use crate::error::{ForecastError, Result};
use energy_math::statistics::ErrorSpread;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use tracing::{debug, warn};

pub mod exponential_smoothing;
pub mod holt_winters;

pub use exponential_smoothing::SimpleSmoothing;
pub use holt_winters::HoltWinters;

/// Multiplier for a 95% normal-approximation confidence band
pub const CONFIDENCE_Z: f64 = 1.96;

/// Floor applied to every point forecast
pub const MIN_FORECAST: f64 = 100.0;

/// Value returned for every step when there is nothing to learn from
pub const DEFAULT_FORECAST: f64 = 10_000.0;

/// One forecast step with its confidence band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    pub value: f64,
    pub upper_bound: f64,
    pub lower_bound: f64,
}

impl ForecastPoint {
    /// Point with a `±1.96·std_dev` band, lower bound clamped at zero
    pub fn with_band(value: f64, std_dev: f64) -> Self {
        Self {
            value,
            upper_bound: value + CONFIDENCE_Z * std_dev,
            lower_bound: (value - CONFIDENCE_Z * std_dev).max(0.0),
        }
    }
}

/// Result of a forecast operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastOutput {
    pub forecasts: Vec<ForecastPoint>,
    /// Mean absolute in-sample error
    pub mae: f64,
    /// Spread of the in-sample errors
    pub std_dev: f64,
}

impl ForecastOutput {
    /// `horizon` copies of the default forecast
    pub fn default_series(horizon: usize) -> Self {
        let point = ForecastPoint {
            value: DEFAULT_FORECAST,
            upper_bound: DEFAULT_FORECAST * 1.2,
            lower_bound: DEFAULT_FORECAST * 0.8,
        };
        Self {
            forecasts: vec![point; horizon],
            mae: 0.0,
            std_dev: DEFAULT_FORECAST * 0.1,
        }
    }

    /// Number of steps forecasted
    pub fn horizon(&self) -> usize {
        self.forecasts.len()
    }

    pub fn values(&self) -> Vec<f64> {
        self.forecasts.iter().map(|p| p.value).collect()
    }

    pub fn upper_bounds(&self) -> Vec<f64> {
        self.forecasts.iter().map(|p| p.upper_bound).collect()
    }

    pub fn lower_bounds(&self) -> Vec<f64> {
        self.forecasts.iter().map(|p| p.lower_bound).collect()
    }
}

/// Smoothing constants and seasonal period
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParams {
    /// Level smoothing
    pub alpha: f64,
    /// Trend smoothing
    pub beta: f64,
    /// Seasonal smoothing
    pub gamma: f64,
    /// Season length in steps
    pub period: usize,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            alpha: 0.3,
            beta: 0.1,
            gamma: 0.1,
            period: 7,
        }
    }
}

impl ModelParams {
    /// Check every constant is in (0, 1] and the period is non-zero
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("alpha", self.alpha),
            ("beta", self.beta),
            ("gamma", self.gamma),
        ] {
            validate_smoothing(name, value)?;
        }
        if self.period == 0 {
            return Err(ForecastError::InvalidParameter(
                "Seasonal period must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

pub(crate) fn validate_smoothing(name: &str, value: f64) -> Result<()> {
    if !(value > 0.0 && value <= 1.0) {
        return Err(ForecastError::InvalidParameter(format!(
            "{} must be in (0, 1], got {}",
            name, value
        )));
    }
    Ok(())
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Generate forecast for future periods
    fn forecast(&self, horizon: usize) -> ForecastOutput;

    /// Absolute in-sample errors the confidence band is derived from
    fn errors(&self) -> &[f64];

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on a consumption series
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on already filtered values
    fn train(&self, values: &[f64]) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

/// Error statistics shared by the smoothing models
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct BandStats {
    pub mae: f64,
    pub std_dev: f64,
    /// Deviation actually used for bands, never below `5%` of the base
    pub band_std_dev: f64,
}

impl BandStats {
    /// Summarize `errors`, falling back to fractions of `base` when there are none
    pub fn from_errors(errors: &[f64], base: f64) -> Self {
        let (mae, std_dev) = match ErrorSpread::from_errors(errors) {
            Ok(spread) => (spread.mean, spread.std_dev),
            Err(_) => (base * 0.1, base * 0.15),
        };
        Self {
            mae,
            std_dev,
            band_std_dev: std_dev.max(base * 0.05),
        }
    }
}

/// Strictly positive, finite entries of `values`, in order
pub fn usable_values(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite() && *v > 0.0)
        .collect()
}

/// Forecast `horizon` steps, never failing
///
/// Uses Holt-Winters when at least two full seasons of usable values exist,
/// simple exponential smoothing when fewer, and the default series when
/// there are none.
pub fn forecast(values: &[f64], params: &ModelParams, horizon: usize) -> ForecastOutput {
    let usable = usable_values(values);
    if usable.is_empty() {
        warn!(
            input = values.len(),
            horizon, "no positive values to forecast from, using default series"
        );
        return ForecastOutput::default_series(horizon);
    }

    let seasonal = HoltWinters::from_params(params);
    let trained = if usable.len() >= seasonal.min_len() {
        seasonal.train(&usable).map(|m| m.forecast(horizon))
    } else {
        debug!(
            usable = usable.len(),
            needed = seasonal.min_len(),
            "too short for seasonal model, using simple smoothing"
        );
        SimpleSmoothing::from_alpha(params.alpha)
            .train(&usable)
            .map(|m| m.forecast(horizon))
    };

    trained.unwrap_or_else(|err| {
        warn!(%err, "model training failed, using default series");
        ForecastOutput::default_series(horizon)
    })
}
