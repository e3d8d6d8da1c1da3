//! End-to-end prediction report for a consumption history
//!
//! [`generate_predictions`] runs the forecaster, anomaly detector, trend
//! estimator, weekday patterns and holdout validation over one history and
//! assembles the dashboard document. "Now" is always passed in by the caller.

use crate::anomaly::{detect_anomalies, Anomaly, AnomalyMethod, Severity};
use crate::data::{normalize_records, Observation, ReadingRecord};
use crate::error::{ForecastError, Result};
use crate::metrics::{holdout_accuracy, AccuracyLabel, AccuracyScore};
use crate::models::{forecast, usable_values, ForecastOutput, ForecastPoint, ModelParams};
use crate::patterns::{next_peak_date, DayPatterns};
use crate::trend::{linear_trend, TrendDirection};
use chrono::{DateTime, Duration, NaiveDate, SecondsFormat, Utc};
use energy_math::{round_half_up, round_to_tenth};
use serde::{Deserialize, Serialize, Serializer};
use tracing::{debug, info};

/// Message carried by the empty-history sentinel
pub const INSUFFICIENT_HISTORY: &str = "Insufficient historical data";

/// Point in time the weekly and active anomaly windows are measured back from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecencyAnchor {
    /// The `now` passed to [`generate_predictions`]
    #[default]
    Now,
    /// The newest observation in the history
    LatestObservation,
}

/// Knobs for a prediction run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionOptions {
    /// Forecast horizon in steps (days for daily totals)
    pub forecast_days: usize,
    pub anomaly_threshold: f64,
    pub anomaly_method: AnomalyMethod,
    /// Smoothing constants; configured through the `[model]` section
    #[serde(skip)]
    pub model: ModelParams,
    /// Unit label on the forecast series
    pub unit: String,
    pub recency_anchor: RecencyAnchor,
    /// Relative slope per step below which the trend is reported as stable
    pub trend_tolerance: f64,
    /// Cap on anomalies listed in the report; counts are taken before the cap
    pub anomaly_limit: Option<usize>,
}

impl Default for PredictionOptions {
    fn default() -> Self {
        Self {
            forecast_days: 7,
            anomaly_threshold: 2.5,
            anomaly_method: AnomalyMethod::ZScore,
            model: ModelParams::default(),
            unit: "kWh".to_string(),
            recency_anchor: RecencyAnchor::Now,
            trend_tolerance: 0.001,
            anomaly_limit: None,
        }
    }
}

impl PredictionOptions {
    pub fn with_forecast_days(mut self, days: usize) -> Self {
        self.forecast_days = days;
        self
    }

    pub fn with_anomaly_threshold(mut self, threshold: f64) -> Self {
        self.anomaly_threshold = threshold;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.model.validate()?;
        if !(self.anomaly_threshold.is_finite() && self.anomaly_threshold > 0.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "Anomaly threshold must be positive, got {}",
                self.anomaly_threshold
            )));
        }
        if !(self.trend_tolerance.is_finite() && self.trend_tolerance >= 0.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "Trend tolerance must be non-negative, got {}",
                self.trend_tolerance
            )));
        }
        Ok(())
    }
}

/// Forecast values and bands, one decimal
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastSeries {
    /// Horizon label such as `"7d"`
    pub horizon: String,
    pub unit: String,
    pub values: Vec<f64>,
    pub upper_bounds: Vec<f64>,
    pub lower_bounds: Vec<f64>,
}

impl ForecastSeries {
    fn from_output(output: &ForecastOutput, horizon_days: usize, unit: &str) -> Self {
        let round_all = |v: Vec<f64>| v.into_iter().map(round_to_tenth).collect();
        Self {
            horizon: format!("{}d", horizon_days),
            unit: unit.to_string(),
            values: round_all(output.values()),
            upper_bounds: round_all(output.upper_bounds()),
            lower_bounds: round_all(output.lower_bounds()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendSummary {
    /// Slope per step, three decimals
    pub slope: f64,
    pub direction: TrendDirection,
}

/// An anomaly located in time
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyReport {
    pub index: usize,
    /// Observed value, one decimal
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_score: Option<f64>,
    pub severity: Severity,
    /// ISO-8601 with milliseconds, `2024-01-21T00:00:00.000Z`
    #[serde(serialize_with = "serialize_millis")]
    pub timestamp: DateTime<Utc>,
}

fn serialize_millis<S: Serializer>(
    timestamp: &DateTime<Utc>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&timestamp.to_rfc3339_opts(SecondsFormat::Millis, true))
}

impl AnomalyReport {
    fn new(anomaly: &Anomaly, observation: &Observation) -> Self {
        Self {
            index: anomaly.index,
            value: round_to_tenth(observation.value),
            z_score: anomaly.z_score,
            severity: anomaly.severity,
            timestamp: observation.timestamp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelMetrics {
    pub mae: f64,
    pub std_dev: f64,
}

/// Full dashboard document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub tomorrows_forecast_kwh: f64,
    pub forecast_change_percent: f64,
    pub prediction_accuracy_label: AccuracyLabel,
    pub prediction_accuracy_percent: f64,
    pub weekly_anomalies: usize,
    pub active_anomalies: usize,
    pub next_peak_day: NaiveDate,
    pub forecast_series: ForecastSeries,
    pub trend: TrendSummary,
    pub anomalies: Vec<AnomalyReport>,
    pub day_patterns: DayPatterns,
    pub model_metrics: ModelMetrics,
}

/// Sentinel returned for an empty history
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsufficientHistory {
    pub error: String,
    pub forecasts: Vec<ForecastPoint>,
    pub anomalies: Vec<AnomalyReport>,
    pub accuracy: AccuracyScore,
}

impl Default for InsufficientHistory {
    fn default() -> Self {
        Self {
            error: INSUFFICIENT_HISTORY.to_string(),
            forecasts: Vec::new(),
            anomalies: Vec::new(),
            accuracy: AccuracyScore::perfect(),
        }
    }
}

/// Either a report or the empty-history sentinel, serialized without a tag
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PredictionOutcome {
    Insufficient(InsufficientHistory),
    Predictions(Box<PredictionResult>),
}

impl PredictionOutcome {
    pub fn predictions(&self) -> Option<&PredictionResult> {
        match self {
            PredictionOutcome::Predictions(result) => Some(result),
            PredictionOutcome::Insufficient(_) => None,
        }
    }

    pub fn into_result(self) -> Result<PredictionResult> {
        match self {
            PredictionOutcome::Predictions(result) => Ok(*result),
            PredictionOutcome::Insufficient(sentinel) => {
                Err(ForecastError::InsufficientData(sentinel.error))
            }
        }
    }
}

/// Build the prediction report for a chronologically ordered history
///
/// Never fails: an empty history yields [`PredictionOutcome::Insufficient`],
/// everything else a report backed by whatever fallbacks the data needed.
pub fn generate_predictions(
    history: &[Observation],
    options: &PredictionOptions,
    now: DateTime<Utc>,
) -> PredictionOutcome {
    if history.is_empty() {
        info!("no history supplied, returning insufficient-data sentinel");
        return PredictionOutcome::Insufficient(InsufficientHistory::default());
    }

    PredictionOutcome::Predictions(Box::new(build_report(history, options, now)))
}

/// Normalize loosely shaped records, then [`generate_predictions`]
pub fn generate_predictions_from_records(
    records: &[ReadingRecord],
    options: &PredictionOptions,
    now: DateTime<Utc>,
) -> Result<PredictionOutcome> {
    let history = normalize_records(records)?;
    Ok(generate_predictions(&history, options, now))
}

/// Strict variant of [`generate_predictions`]
///
/// Rejects invalid options, an empty history (`InsufficientData`) and a
/// history without a single positive value (`DegenerateSeries`) instead of
/// substituting placeholder numbers.
pub fn try_generate_predictions(
    history: &[Observation],
    options: &PredictionOptions,
    now: DateTime<Utc>,
) -> Result<PredictionResult> {
    options.validate()?;
    if history.is_empty() {
        return Err(ForecastError::InsufficientData(
            INSUFFICIENT_HISTORY.to_string(),
        ));
    }
    let values: Vec<f64> = history.iter().map(|o| o.value).collect();
    if usable_values(&values).is_empty() {
        return Err(ForecastError::DegenerateSeries(format!(
            "None of the {} observations is a positive finite value",
            history.len()
        )));
    }

    Ok(build_report(history, options, now))
}

fn build_report(
    history: &[Observation],
    options: &PredictionOptions,
    now: DateTime<Utc>,
) -> PredictionResult {
    let values: Vec<f64> = history.iter().map(|o| o.value).collect();

    let output = forecast(&values, &options.model, options.forecast_days);
    let anomalies = detect_anomalies(&values, options.anomaly_method, options.anomaly_threshold);
    let line = linear_trend(&values);
    let patterns = DayPatterns::from_observations(history);
    let score = holdout_accuracy(&values, &options.model);

    let last_value = values.last().copied().unwrap_or(0.0);
    let tomorrow = output
        .forecasts
        .first()
        .map(|p| p.value)
        .unwrap_or(last_value);
    let change_percent = if last_value > 0.0 {
        round_to_tenth((tomorrow - last_value) / last_value * 100.0)
    } else {
        0.0
    };

    let anchor = match options.recency_anchor {
        RecencyAnchor::Now => now,
        RecencyAnchor::LatestObservation => history
            .iter()
            .map(|o| o.timestamp)
            .max()
            .unwrap_or(now),
    };
    let count_since = |since: DateTime<Utc>| {
        anomalies
            .iter()
            .filter(|a| history[a.index].timestamp >= since)
            .count()
    };
    let weekly_anomalies = count_since(anchor - Duration::days(7));
    let active_anomalies = count_since(anchor - Duration::hours(24));

    let listed = options.anomaly_limit.unwrap_or(anomalies.len());
    let reports: Vec<AnomalyReport> = anomalies
        .iter()
        .take(listed)
        .map(|a| AnomalyReport::new(a, &history[a.index]))
        .collect();

    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let trend = TrendSummary {
        slope: round_half_up(line.slope, 3),
        direction: TrendDirection::classify(line.slope, mean, options.trend_tolerance),
    };

    debug!(
        observations = history.len(),
        anomalies = anomalies.len(),
        slope = line.slope,
        accuracy = score.accuracy,
        "assembled prediction report"
    );

    PredictionResult {
        tomorrows_forecast_kwh: round_to_tenth(tomorrow),
        forecast_change_percent: change_percent,
        prediction_accuracy_label: score.label(),
        prediction_accuracy_percent: score.accuracy,
        weekly_anomalies,
        active_anomalies,
        next_peak_day: next_peak_date(&patterns, now),
        forecast_series: ForecastSeries::from_output(&output, options.forecast_days, &options.unit),
        trend,
        anomalies: reports,
        day_patterns: patterns,
        model_metrics: ModelMetrics {
            mae: round_to_tenth(output.mae),
            std_dev: round_to_tenth(output.std_dev),
        },
    }
}
