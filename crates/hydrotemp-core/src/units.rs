//! Unit conversion and rounding utilities

use serde::{Deserialize, Serialize};

/// Offset between Kelvin and Celsius
pub const KELVIN_OFFSET: f64 = 273.15;

/// Temperature scales found in the source data and the views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    Kelvin,
    Celsius,
    Fahrenheit,
}

/// Convert a temperature between scales
pub fn convert_temperature(value: f64, from: TemperatureUnit, to: TemperatureUnit) -> f64 {
    if from == to {
        return value;
    }

    let celsius = match from {
        TemperatureUnit::Kelvin => value - KELVIN_OFFSET,
        TemperatureUnit::Celsius => value,
        TemperatureUnit::Fahrenheit => (value - 32.0) * 5.0 / 9.0,
    };

    match to {
        TemperatureUnit::Kelvin => celsius + KELVIN_OFFSET,
        TemperatureUnit::Celsius => celsius,
        TemperatureUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
    }
}

/// Kelvin to Fahrenheit, rounded to two decimals
pub fn kelvin_to_fahrenheit(kelvin: f64) -> f64 {
    round_to(
        convert_temperature(kelvin, TemperatureUnit::Kelvin, TemperatureUnit::Fahrenheit),
        2,
    )
}

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Round to the nearest multiple of `step` (e.g. 0.5 or 0.05)
pub fn round_to_step(value: f64, step: f64) -> f64 {
    let inverse = (1.0 / step).round();
    (value * inverse).round() / inverse
}

/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}
