//! Simple exponential smoothing for series too short to carry seasonality

use crate::error::{ForecastError, Result};
use crate::models::{
    validate_smoothing, BandStats, ForecastModel, ForecastOutput, ForecastPoint,
    TrainedForecastModel, MIN_FORECAST,
};

/// Simple exponential smoothing model
#[derive(Debug, Clone)]
pub struct SimpleSmoothing {
    /// Name of the model
    name: String,
    /// Smoothing parameter
    alpha: f64,
}

/// Trained simple exponential smoothing model
#[derive(Debug, Clone)]
pub struct TrainedSimpleSmoothing {
    name: String,
    /// Final smoothed level
    level: f64,
    /// Absolute one-step errors, each taken before the level update
    errors: Vec<f64>,
    stats: BandStats,
}

impl SimpleSmoothing {
    /// Create a new exponential smoothing model
    pub fn new(alpha: f64) -> Result<Self> {
        validate_smoothing("alpha", alpha)?;
        Ok(Self::from_alpha(alpha))
    }

    /// Create without validating; training rejects a bad alpha
    pub(crate) fn from_alpha(alpha: f64) -> Self {
        Self {
            name: format!("Simple Exponential Smoothing (alpha={})", alpha),
            alpha,
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl ForecastModel for SimpleSmoothing {
    type Trained = TrainedSimpleSmoothing;

    fn train(&self, values: &[f64]) -> Result<Self::Trained> {
        validate_smoothing("alpha", self.alpha)?;
        let Some((&first, rest)) = values.split_first() else {
            return Err(ForecastError::InsufficientData(
                "Empty consumption series".to_string(),
            ));
        };

        let mut level = first.max(MIN_FORECAST);
        let mut errors = Vec::with_capacity(rest.len());

        for &value in rest {
            errors.push((value - level).abs());
            level = self.alpha * value + (1.0 - self.alpha) * level;
        }

        let stats = BandStats::from_errors(&errors, level);

        Ok(TrainedSimpleSmoothing {
            name: self.name.clone(),
            level,
            errors,
            stats,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedSimpleSmoothing {
    /// Final smoothed level
    pub fn level(&self) -> f64 {
        self.level
    }
}

impl TrainedForecastModel for TrainedSimpleSmoothing {
    fn forecast(&self, horizon: usize) -> ForecastOutput {
        // No trend or season: every step is the same level
        let point = ForecastPoint::with_band(self.level.max(MIN_FORECAST), self.stats.band_std_dev);

        ForecastOutput {
            forecasts: vec![point; horizon],
            mae: self.stats.mae,
            std_dev: self.stats.band_std_dev,
        }
    }

    fn errors(&self) -> &[f64] {
        &self.errors
    }

    fn name(&self) -> &str {
        &self.name
    }
}
