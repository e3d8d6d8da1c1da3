//! Layered configuration for prediction runs
//!
//! Built-in defaults, then an optional TOML file, then `ENERGY__*`
//! environment variables (`ENERGY__PREDICTION__FORECAST_DAYS=14`,
//! `ENERGY__MODEL__ALPHA=0.5`).

use crate::error::Result;
use crate::models::ModelParams;
use crate::predictions::PredictionOptions;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "ENERGY";

/// Separator between nested keys in environment overrides
pub const ENV_SEPARATOR: &str = "__";

/// Settings file layout
///
/// ```toml
/// [model]
/// alpha = 0.3
/// period = 7
///
/// [prediction]
/// forecast_days = 7
/// anomaly_method = "zscore"
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub model: ModelParams,
    pub prediction: PredictionOptions,
}

impl AnalyticsConfig {
    /// Load from defaults, `path` and the environment, then validate
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Some(path) = path {
            debug!(path = %path.display(), "reading configuration file");
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }

        let config: Self = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.prediction_options().validate()?;
        Ok(config)
    }

    /// Options for [`generate_predictions`](crate::generate_predictions) with
    /// the `[model]` section applied
    pub fn prediction_options(&self) -> PredictionOptions {
        PredictionOptions {
            model: self.model,
            ..self.prediction.clone()
        }
    }
}

/// Shorthand for `AnalyticsConfig::load(path)?.prediction_options()`
pub fn load_options(path: Option<&Path>) -> Result<PredictionOptions> {
    Ok(AnalyticsConfig::load(path)?.prediction_options())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anomaly::AnomalyMethod;
    use crate::error::ForecastError;
    use crate::predictions::RecencyAnchor;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn toml_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_without_file() {
        let options = load_options(None).unwrap();
        assert_eq!(options, PredictionOptions::default());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let file = toml_file(
            r#"
[model]
alpha = 0.5

[prediction]
forecast_days = 14
anomaly_method = "iqr"
recency_anchor = "latest_observation"
anomaly_limit = 5
"#,
        );
        let config = AnalyticsConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.model.alpha, 0.5);
        assert_eq!(config.model.beta, 0.1);

        let options = config.prediction_options();
        assert_eq!(options.forecast_days, 14);
        assert_eq!(options.anomaly_method, AnomalyMethod::Iqr);
        assert_eq!(options.recency_anchor, RecencyAnchor::LatestObservation);
        assert_eq!(options.anomaly_limit, Some(5));
        assert_eq!(options.model.alpha, 0.5);
        assert_eq!(options.unit, "kWh");
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let file = toml_file("[model]\nalpha = 1.5\n");
        assert!(matches!(
            load_options(Some(file.path())),
            Err(ForecastError::InvalidParameter(_))
        ));

        let file = toml_file("[prediction]\nanomaly_threshold = 0\n");
        assert!(matches!(
            load_options(Some(file.path())),
            Err(ForecastError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let missing = Path::new("/nonexistent/energy.toml");
        assert!(matches!(
            load_options(Some(missing)),
            Err(ForecastError::Config(_))
        ));
    }
}
