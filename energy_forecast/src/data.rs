//! Consumption observations and the adapters that produce them
//!
//! Callers hand in loosely shaped records (daily aggregates keyed by
//! `value`, `totalKwh` or `powerConsumption`, dated by `timestamp`, `_id` or
//! `date`). [`ReadingRecord::normalize`] turns each one into an
//! [`Observation`], which is the only shape the analytics code sees.

use crate::error::{ForecastError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// One consumption measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl Observation {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// A caller record before normalization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadingRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(
        default,
        rename = "totalKwh",
        alias = "total_kwh",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_kwh: Option<f64>,
    #[serde(
        default,
        rename = "powerConsumption",
        alias = "power_consumption",
        skip_serializing_if = "Option::is_none"
    )]
    pub power_consumption: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl ReadingRecord {
    /// Record with a canonical value and timestamp
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self {
            value: Some(value),
            timestamp: Some(timestamp.to_rfc3339()),
            ..Self::default()
        }
    }

    /// First present, non-zero, non-NaN value among `value`, `totalKwh`,
    /// `powerConsumption`; 0 when none qualifies
    pub fn resolved_value(&self) -> f64 {
        [self.value, self.total_kwh, self.power_consumption]
            .into_iter()
            .flatten()
            .find(|v| *v != 0.0 && !v.is_nan())
            .unwrap_or(0.0)
    }

    /// First parseable timestamp among `timestamp`, `_id`, `date`
    pub fn resolved_timestamp(&self) -> Result<DateTime<Utc>> {
        [&self.timestamp, &self.id, &self.date]
            .into_iter()
            .flatten()
            .find_map(|raw| parse_timestamp(raw).ok())
            .ok_or_else(|| {
                ForecastError::DataError(format!(
                    "Record has no parseable timestamp (timestamp={:?}, _id={:?}, date={:?})",
                    self.timestamp, self.id, self.date
                ))
            })
    }

    /// Convert into the canonical observation shape
    pub fn normalize(&self) -> Result<Observation> {
        Ok(Observation {
            timestamp: self.resolved_timestamp()?,
            value: self.resolved_value(),
        })
    }
}

impl From<Observation> for ReadingRecord {
    fn from(obs: Observation) -> Self {
        Self::new(obs.timestamp, obs.value)
    }
}

/// Normalize a batch of records, failing on the first unusable one
pub fn normalize_records(records: &[ReadingRecord]) -> Result<Vec<Observation>> {
    records.iter().map(ReadingRecord::normalize).collect()
}

/// Parse RFC 3339, `YYYY-MM-DDTHH:MM:SS` (UTC assumed) or `YYYY-MM-DD`
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(Utc.from_utc_datetime(&naive));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(Utc.from_utc_datetime(&naive));
    }
    if let Some(midnight) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(Utc.from_utc_datetime(&midnight));
    }

    Err(ForecastError::DataError(format!(
        "Unrecognized timestamp: {}",
        raw
    )))
}

/// Bucket size used when aggregating raw readings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Daily,
    Hourly,
}

impl Granularity {
    /// Length of one bucket
    pub fn step(&self) -> chrono::Duration {
        match self {
            Granularity::Daily => chrono::Duration::days(1),
            Granularity::Hourly => chrono::Duration::hours(1),
        }
    }

    fn bucket_start(&self, ts: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let day = ts.date_naive();
        let naive = match self {
            Granularity::Daily => day.and_hms_opt(0, 0, 0)?,
            Granularity::Hourly => day.and_hms_opt(ts.hour(), 0, 0)?,
        };
        Some(Utc.from_utc_datetime(&naive))
    }
}

impl FromStr for Granularity {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "daily" | "day" => Ok(Granularity::Daily),
            "hourly" | "hour" => Ok(Granularity::Hourly),
            other => Err(ForecastError::InvalidParameter(format!(
                "Unknown granularity: {}",
                other
            ))),
        }
    }
}

/// Sum raw sensor readings into per-day or per-hour totals
///
/// Each total is stamped with the earliest reading in its bucket. Output is
/// ascending by bucket and omits buckets whose total is not positive.
pub fn aggregate_readings(readings: &[Observation], granularity: Granularity) -> Vec<Observation> {
    let mut buckets: BTreeMap<DateTime<Utc>, (DateTime<Utc>, f64)> = BTreeMap::new();

    for reading in readings {
        let Some(key) = granularity.bucket_start(reading.timestamp) else {
            continue;
        };
        let value = if reading.value.is_finite() {
            reading.value
        } else {
            0.0
        };
        let entry = buckets.entry(key).or_insert((reading.timestamp, 0.0));
        if reading.timestamp < entry.0 {
            entry.0 = reading.timestamp;
        }
        entry.1 += value;
    }

    let totals: Vec<Observation> = buckets
        .into_values()
        .filter(|(_, total)| *total > 0.0)
        .map(|(first, total)| Observation::new(first, total))
        .collect();

    debug!(
        readings = readings.len(),
        buckets = totals.len(),
        ?granularity,
        "aggregated readings"
    );
    totals
}

/// Load records from a CSV file with a header row
///
/// Recognized columns are the [`ReadingRecord`] field names; unknown columns
/// are ignored.
pub fn load_records_csv<P: AsRef<Path>>(path: P) -> Result<Vec<ReadingRecord>> {
    let file = File::open(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }
    Ok(records)
}

/// Load records from a JSON array
pub fn load_records_json<P: AsRef<Path>>(path: P) -> Result<Vec<ReadingRecord>> {
    let file = File::open(path)?;
    let records = serde_json::from_reader(std::io::BufReader::new(file))?;
    Ok(records)
}
