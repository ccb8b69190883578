//! Deterministic synthetic monthly data for years without usable measurements
//!
//! Nothing here is ever substituted for real data implicitly: callers invoke
//! [`generate`] explicitly and every result carries `has_complete_data` so the
//! presentation layer can label it.

use serde::{Deserialize, Serialize};

use crate::types::MONTH_NAMES;
use crate::units::round_to_step;

/// Seasonal temperature curve, °F, January first
pub const BASE_TEMPERATURES_F: [f64; 12] = [
    30.0, 34.0, 42.0, 55.0, 65.0, 75.0, 80.0, 78.0, 70.0, 60.0, 48.0, 36.0,
];

/// Seasonal turbidity curve, NTU, January first
pub const BASE_TURBIDITIES_NTU: [f64; 12] = [
    0.35, 0.30, 0.45, 0.65, 0.80, 0.95, 1.10, 1.05, 0.80, 0.60, 0.50, 0.40,
];

/// Years with both temperature and real turbidity coverage
pub const COMPLETE_DATA_YEARS: [i32; 13] = [
    1960, 1965, 1970, 1975, 1980, 1985, 1990, 1995, 2000, 2005, 2010, 2015, 2020,
];

const TREND_START_YEAR: i32 = 1960;
const TREND_SPAN_YEARS: f64 = 70.0;

pub fn is_complete_data_year(year: i32) -> bool {
    COMPLETE_DATA_YEARS.contains(&year)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticMonth {
    pub year: i32,
    pub month: u32,
    #[serde(rename = "monthName")]
    pub month_name: String,
    #[serde(rename = "temperatureF")]
    pub temperature_f: f64,
    /// `None` for years outside [`COMPLETE_DATA_YEARS`]
    #[serde(rename = "turbidityNTU")]
    pub turbidity_ntu: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticYear {
    pub year: i32,
    #[serde(rename = "hasCompleteData")]
    pub has_complete_data: bool,
    pub months: Vec<SyntheticMonth>,
}

/// Linear warming trend: -3 °F in 1960 rising to +3 °F in 2030
pub fn temperature_offset(year: i32) -> f64 {
    -3.0 + 6.0 * f64::from(year - TREND_START_YEAR) / TREND_SPAN_YEARS
}

/// Step change in turbidity across treatment eras
pub fn turbidity_factor(year: i32) -> f64 {
    if year < 1980 {
        1.2
    } else if year > 2000 {
        0.8
    } else {
        1.0
    }
}

// Small per-month wobble in -2..=2
fn perturbation(year: i32, month: u32) -> f64 {
    let seed = year.rem_euclid(5) + month as i32;
    f64::from(seed.rem_euclid(5) - 2)
}

/// Generate the twelve synthetic months for `year`
pub fn generate(year: i32) -> SyntheticYear {
    let has_complete_data = is_complete_data_year(year);
    let offset = temperature_offset(year);
    let factor = turbidity_factor(year);

    let months = (1..=12u32)
        .zip(MONTH_NAMES)
        .map(|(month, name)| {
            let idx = (month - 1) as usize;
            let wobble = perturbation(year, month);

            let temperature_f = round_to_step(BASE_TEMPERATURES_F[idx] + offset, 0.5) + wobble * 0.5;
            let turbidity_ntu = has_complete_data
                .then(|| round_to_step(BASE_TURBIDITIES_NTU[idx] * factor, 0.05) + wobble * 0.025);

            SyntheticMonth {
                year,
                month,
                month_name: name.to_string(),
                temperature_f,
                turbidity_ntu,
            }
        })
        .collect();

    SyntheticYear {
        year,
        has_complete_data,
        months,
    }
}
