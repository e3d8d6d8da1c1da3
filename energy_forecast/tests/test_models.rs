use approx::assert_abs_diff_eq;
use energy_forecast::models::{
    forecast, ForecastModel, HoltWinters, ModelParams, SimpleSmoothing, TrainedForecastModel,
    DEFAULT_FORECAST,
};
use energy_forecast::ForecastError;
use rstest::rstest;
use std::f64::consts::PI;

#[test]
fn test_simple_smoothing_short_series() {
    let model = SimpleSmoothing::new(0.3).unwrap();
    let trained = model.train(&[100.0, 200.0, 300.0]).unwrap();
    let output = trained.forecast(3);

    // level: 100 -> 130 -> 181; errors 100 and 170
    assert_abs_diff_eq!(trained.level(), 181.0, epsilon = 1e-9);
    assert_abs_diff_eq!(output.mae, 135.0, epsilon = 1e-9);
    assert_abs_diff_eq!(output.std_dev, 35.0, epsilon = 1e-9);
    for point in &output.forecasts {
        assert_abs_diff_eq!(point.value, 181.0, epsilon = 1e-9);
        assert_abs_diff_eq!(point.upper_bound, 249.6, epsilon = 1e-9);
        assert_abs_diff_eq!(point.lower_bound, 112.4, epsilon = 1e-9);
    }
}

#[test]
fn test_holt_winters_follows_linear_growth() {
    let values: Vec<f64> = (0..21).map(|i| 1000.0 + 20.0 * i as f64).collect();
    let trained = HoltWinters::new(ModelParams::default())
        .unwrap()
        .train(&values)
        .unwrap();
    let output = trained.forecast(7);

    assert_abs_diff_eq!(output.forecasts[0].value, 1333.8, epsilon = 0.05);
    assert_abs_diff_eq!(output.mae, 35.18, epsilon = 0.01);
    assert!(output.forecasts[6].value > output.forecasts[0].value);
}

#[rstest]
#[case(0.0)]
#[case(-0.2)]
#[case(1.2)]
#[case(f64::NAN)]
fn test_invalid_alpha(#[case] alpha: f64) {
    assert!(matches!(
        SimpleSmoothing::new(alpha),
        Err(ForecastError::InvalidParameter(_))
    ));
    let params = ModelParams {
        alpha,
        ..ModelParams::default()
    };
    assert!(HoltWinters::new(params).is_err());
}

fn weekly_wave(len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| 10_000.0 + 500.0 * (2.0 * PI * i as f64 / 7.0).sin())
        .collect()
}

#[test]
fn test_one_season_short_uses_simple_smoothing() {
    let params = ModelParams::default();
    let values = weekly_wave(13);

    let expected = SimpleSmoothing::new(params.alpha)
        .unwrap()
        .train(&values)
        .unwrap()
        .forecast(7);
    let output = forecast(&values, &params, 7);

    assert_eq!(output, expected);
    let first = output.forecasts[0].value;
    assert!(output.forecasts.iter().all(|p| p.value == first));
}

#[test]
fn test_two_full_seasons_use_holt_winters() {
    let params = ModelParams::default();
    let values = weekly_wave(14);

    let expected = HoltWinters::new(params)
        .unwrap()
        .train(&values)
        .unwrap()
        .forecast(7);
    let output = forecast(&values, &params, 7);

    assert_eq!(output, expected);
    // Continues the wave: 10000.0, 10390.9, 10487.5, ...
    assert_abs_diff_eq!(output.forecasts[0].value, 10_000.0, epsilon = 0.1);
    assert_abs_diff_eq!(output.forecasts[2].value, 10_487.5, epsilon = 0.1);
}

#[test]
fn test_non_positive_values_are_ignored() {
    let with_gaps = forecast(
        &[0.0, 100.0, f64::NAN, 200.0, -4.0, 300.0, f64::INFINITY],
        &ModelParams::default(),
        2,
    );
    let clean = forecast(&[100.0, 200.0, 300.0], &ModelParams::default(), 2);
    assert_eq!(with_gaps, clean);

    let nothing = forecast(&[0.0, 0.0], &ModelParams::default(), 2);
    assert_eq!(nothing.forecasts[0].value, DEFAULT_FORECAST);
}

#[test]
fn test_forecast_floor() {
    let output = forecast(&[5.0, 3.0, 4.0], &ModelParams::default(), 4);
    for point in &output.forecasts {
        assert!(point.value >= 100.0);
        assert!(point.lower_bound >= 0.0);
    }
}
