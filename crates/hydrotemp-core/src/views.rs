//! Read-only chart projections for a selected year

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fallback;
use crate::threshold::WARM_THRESHOLD_F;
use crate::types::{YearlyAverage, YearlyRow, MONTH_NAMES};
use crate::units::round_to;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("No data for year {0}")]
    NoDataForYear(i32),
}

pub type ViewResult<T> = Result<T, ViewError>;

/// Where a series' values came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SeriesOrigin {
    Measured,
    Synthetic {
        #[serde(rename = "completeData")]
        complete_data: bool,
    },
}

/// How the turbidity values of a combined series were obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TurbidityBasis {
    /// `temperature / 100 + 0.3`, not a measurement
    TemperatureProxy,
    /// Seasonal pattern from the fallback generator
    SyntheticPattern,
    /// No turbidity for this year
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthPoint {
    pub month: u32,
    #[serde(rename = "monthName")]
    pub month_name: String,
    #[serde(rename = "temperatureF")]
    pub temperature_f: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySeries {
    pub year: i32,
    pub points: Vec<MonthPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlySeries {
    pub points: Vec<YearlyAverage>,
    #[serde(rename = "thresholdF")]
    pub threshold_f: f64,
    /// One threshold value per point, for drawing the reference line
    #[serde(rename = "thresholdLine")]
    pub threshold_line: Vec<f64>,
    #[serde(rename = "firstWarmYear")]
    pub first_warm_year: Option<YearlyAverage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedPoint {
    pub month: u32,
    #[serde(rename = "monthName")]
    pub month_name: String,
    #[serde(rename = "temperatureF")]
    pub temperature_f: f64,
    #[serde(rename = "turbidityNTU")]
    pub turbidity_ntu: Option<f64>,
}

/// Temperature against turbidity for one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    #[serde(rename = "monthName")]
    pub month_name: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedSeries {
    pub year: i32,
    pub origin: SeriesOrigin,
    #[serde(rename = "turbidityBasis")]
    pub turbidity_basis: TurbidityBasis,
    pub points: Vec<CombinedPoint>,
    pub scatter: Vec<ScatterPoint>,
}

impl CombinedSeries {
    fn new(
        year: i32,
        origin: SeriesOrigin,
        turbidity_basis: TurbidityBasis,
        points: Vec<CombinedPoint>,
    ) -> Self {
        let scatter = points
            .iter()
            .filter_map(|p| {
                Some(ScatterPoint {
                    month_name: p.month_name.clone(),
                    x: p.temperature_f,
                    y: p.turbidity_ntu?,
                })
            })
            .collect();
        Self {
            year,
            origin,
            turbidity_basis,
            points,
            scatter,
        }
    }
}

/// Month temperature by name, falling back to the month number
fn resolve_month(row: &YearlyRow, idx: usize) -> Option<f64> {
    row.value_by_name(MONTH_NAMES[idx])
        .or_else(|| row.value_by_number(idx as u32 + 1))
}

fn resolved_points(rows: &[YearlyRow], year: i32) -> ViewResult<Vec<MonthPoint>> {
    let row = rows
        .iter()
        .find(|r| r.year == year)
        .ok_or(ViewError::NoDataForYear(year))?;

    let points: Vec<MonthPoint> = MONTH_NAMES
        .iter()
        .enumerate()
        .filter_map(|(idx, name)| {
            Some(MonthPoint {
                month: idx as u32 + 1,
                month_name: name.to_string(),
                temperature_f: resolve_month(row, idx)?,
            })
        })
        .collect();

    if points.is_empty() {
        return Err(ViewError::NoDataForYear(year));
    }
    Ok(points)
}

/// Month-ordered temperatures for the single-year chart
pub fn monthly_series(rows: &[YearlyRow], year: i32) -> ViewResult<MonthlySeries> {
    Ok(MonthlySeries {
        year,
        points: resolved_points(rows, year)?,
    })
}

/// Long-run yearly averages with the fixed threshold line
pub fn yearly_series(yearly: &[YearlyAverage], first_warm_year: Option<YearlyAverage>) -> YearlySeries {
    YearlySeries {
        points: yearly.to_vec(),
        threshold_f: WARM_THRESHOLD_F,
        threshold_line: vec![WARM_THRESHOLD_F; yearly.len()],
        first_warm_year,
    }
}

/// Turbidity stand-in derived from temperature
pub fn proxy_turbidity(temperature_f: f64) -> f64 {
    round_to(temperature_f / 100.0 + 0.3, 2)
}

/// Monthly temperature with proxy turbidity for the combined charts.
///
/// Turbidity here is [`proxy_turbidity`], not the measured values; the series
/// is tagged [`TurbidityBasis::TemperatureProxy`] so consumers can say so.
pub fn combined_series(rows: &[YearlyRow], year: i32) -> ViewResult<CombinedSeries> {
    let points = resolved_points(rows, year)?
        .into_iter()
        .map(|p| CombinedPoint {
            turbidity_ntu: Some(proxy_turbidity(p.temperature_f)),
            month: p.month,
            month_name: p.month_name,
            temperature_f: p.temperature_f,
        })
        .collect();

    Ok(CombinedSeries::new(
        year,
        SeriesOrigin::Measured,
        TurbidityBasis::TemperatureProxy,
        points,
    ))
}

/// Synthetic combined series, labeled as such
pub fn fallback_series(year: i32) -> CombinedSeries {
    let synthetic = fallback::generate(year);
    let basis = if synthetic.has_complete_data {
        TurbidityBasis::SyntheticPattern
    } else {
        TurbidityBasis::Unavailable
    };

    let points = synthetic
        .months
        .into_iter()
        .map(|m| CombinedPoint {
            month: m.month,
            month_name: m.month_name,
            temperature_f: m.temperature_f,
            turbidity_ntu: m.turbidity_ntu,
        })
        .collect();

    CombinedSeries::new(
        year,
        SeriesOrigin::Synthetic {
            complete_data: synthetic.has_complete_data,
        },
        basis,
        points,
    )
}
