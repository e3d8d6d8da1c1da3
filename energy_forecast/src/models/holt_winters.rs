//! Holt-Winters triple exponential smoothing (multiplicative seasonality)
//!
//! ```text
//! Level:    L_i = α (x_i / S_{i mod p}) + (1 - α)(L_{i-1} + T_{i-1})
//! Trend:    T_i = β (L_i - L_{i-1}) + (1 - β) T_{i-1}
//! Season:   S_{i mod p} = clamp(γ (x_i / L_i) + (1 - γ) S_{i mod p}, 0.5, 2.0)
//! Forecast: F_{n+k} = max(100, (L_n + k T_n) S_{(n+k-1) mod p})
//! ```
//!
//! Seasonal factors are clamped to `[0.5, 2.0]` at initialization and on
//! every update.

use crate::error::{ForecastError, Result};
use crate::models::{
    BandStats, ForecastModel, ForecastOutput, ForecastPoint, ModelParams, TrainedForecastModel,
    MIN_FORECAST,
};
use tracing::debug;

const SEASONAL_MIN: f64 = 0.5;
const SEASONAL_MAX: f64 = 2.0;

fn clamp_seasonal(factor: f64) -> f64 {
    factor.clamp(SEASONAL_MIN, SEASONAL_MAX)
}

/// Triple exponential smoothing model
#[derive(Debug, Clone)]
pub struct HoltWinters {
    name: String,
    params: ModelParams,
}

/// Fitted level, trend and seasonal state
#[derive(Debug, Clone)]
pub struct TrainedHoltWinters {
    name: String,
    period: usize,
    /// Number of observations the model was fitted on
    len: usize,
    level: f64,
    trend: f64,
    seasonals: Vec<f64>,
    errors: Vec<f64>,
    stats: BandStats,
}

impl HoltWinters {
    /// Create a validated model
    pub fn new(params: ModelParams) -> Result<Self> {
        params.validate()?;
        Ok(Self::from_params(&params))
    }

    /// Create without validating; training rejects bad parameters
    pub(crate) fn from_params(params: &ModelParams) -> Self {
        Self {
            name: format!(
                "Holt-Winters (alpha={}, beta={}, gamma={}, period={})",
                params.alpha, params.beta, params.gamma, params.period
            ),
            params: *params,
        }
    }

    /// Fewest observations that initialize level, trend and season: two full cycles
    pub fn min_len(&self) -> usize {
        self.params.period * 2
    }
}

impl ForecastModel for HoltWinters {
    type Trained = TrainedHoltWinters;

    fn train(&self, values: &[f64]) -> Result<Self::Trained> {
        self.params.validate()?;
        let ModelParams {
            alpha,
            beta,
            gamma,
            period,
        } = self.params;

        let n = values.len();
        if n < self.min_len() {
            return Err(ForecastError::InsufficientData(format!(
                "Holt-Winters with period {} needs at least {} values, have {}",
                period,
                self.min_len(),
                n
            )));
        }

        let mut level = values[0].max(MIN_FORECAST);
        let mut trend = if n > period {
            (values[period] - values[0]) / period as f64
        } else {
            0.0
        };

        let mut seasonals = vec![1.0; period];
        for (slot, &value) in seasonals.iter_mut().zip(values.iter()) {
            *slot = clamp_seasonal(value / level);
        }

        for (i, &value) in values.iter().enumerate().skip(period) {
            let slot = i % period;
            let prev_level = level;
            let factor = seasonals[slot];

            let deseasonalized = if factor > 0.0 { value / factor } else { value };
            level = alpha * deseasonalized + (1.0 - alpha) * (level + trend);
            trend = beta * (level - prev_level) + (1.0 - beta) * trend;

            if level > 0.0 {
                seasonals[slot] =
                    clamp_seasonal(gamma * (value / level) + (1.0 - gamma) * seasonals[slot]);
            }
        }

        // In-sample errors measured against the final state projected back to each index
        let errors: Vec<f64> = values
            .iter()
            .enumerate()
            .skip(period)
            .map(|(i, &actual)| {
                let offset = i as f64 - n as f64 + 1.0;
                let fitted = (level + trend * offset) * seasonals[i % period];
                (actual - fitted).abs()
            })
            .collect();

        let stats = BandStats::from_errors(&errors, level);

        debug!(
            level,
            trend,
            mae = stats.mae,
            std_dev = stats.std_dev,
            observations = n,
            "fitted holt-winters"
        );

        Ok(TrainedHoltWinters {
            name: self.name.clone(),
            period,
            len: n,
            level,
            trend,
            seasonals,
            errors,
            stats,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedHoltWinters {
    pub fn level(&self) -> f64 {
        self.level
    }

    pub fn trend(&self) -> f64 {
        self.trend
    }

    /// Seasonal factors indexed by `position mod period`
    pub fn seasonals(&self) -> &[f64] {
        &self.seasonals
    }
}

impl TrainedForecastModel for TrainedHoltWinters {
    fn forecast(&self, horizon: usize) -> ForecastOutput {
        let forecasts = (1..=horizon)
            .map(|k| {
                let factor = self.seasonals[(self.len + k - 1) % self.period];
                let value = ((self.level + self.trend * k as f64) * factor).max(MIN_FORECAST);
                ForecastPoint::with_band(value, self.stats.band_std_dev)
            })
            .collect();

        // Reported spread is the raw error deviation; only the bands use the floor
        ForecastOutput {
            forecasts,
            mae: self.stats.mae,
            std_dev: self.stats.std_dev,
        }
    }

    fn errors(&self) -> &[f64] {
        &self.errors
    }

    fn name(&self) -> &str {
        &self.name
    }
}
