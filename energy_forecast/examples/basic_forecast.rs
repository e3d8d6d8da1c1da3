use chrono::{Duration, TimeZone, Utc};
use energy_forecast::data::{aggregate_readings, Granularity};
use energy_forecast::models::{ForecastModel, HoltWinters, TrainedForecastModel};
use energy_forecast::utils::future_timestamps;
use energy_forecast::{generate_predictions, ModelParams, Observation, PredictionOptions};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Energy Forecast: Basic Forecasting Example");
    println!("==========================================\n");

    // Create hourly meter readings and sum them into daily totals
    let readings = create_sample_readings();
    let daily = aggregate_readings(&readings, Granularity::Daily);
    println!(
        "Sample data created: {} hourly readings, {} daily totals\n",
        readings.len(),
        daily.len()
    );

    // Train the seasonal model directly
    let values: Vec<f64> = daily.iter().map(|o| o.value).collect();
    let model = HoltWinters::new(ModelParams::default())?;
    let trained = model.train(&values)?;
    let output = trained.forecast(7);

    println!("{} forecast (7 days):", trained.name());
    let last = daily.last().map(|o| o.timestamp).unwrap_or_else(Utc::now);
    let days = future_timestamps(last, output.horizon(), Granularity::Daily);
    for (day, point) in days.iter().zip(&output.forecasts) {
        println!(
            "  {}: {:.1} kWh ({:.1} .. {:.1})",
            day.format("%a %Y-%m-%d"),
            point.value,
            point.lower_bound,
            point.upper_bound
        );
    }
    println!("MAE: {:.1}, std dev: {:.1}\n", output.mae, output.std_dev);

    // Full report as the dashboard would receive it
    let now = last + Duration::hours(12);
    let outcome = generate_predictions(&daily, &PredictionOptions::default(), now);
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    Ok(())
}

/// Hourly readings for six weeks: a daily load curve, busier weekdays and one faulty spike
fn create_sample_readings() -> Vec<Observation> {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    (0..42 * 24)
        .map(|hour| {
            let timestamp = start + Duration::hours(hour);
            let hour_of_day = (hour % 24) as f64;
            let weekday = (hour / 24) % 7;

            let curve = 300.0 + 150.0 * (std::f64::consts::PI * hour_of_day / 24.0).sin();
            let load = if weekday < 5 { curve * 1.2 } else { curve };
            let value = if hour == 30 * 24 + 14 { load * 40.0 } else { load };
            Observation::new(timestamp, value)
        })
        .collect()
}
