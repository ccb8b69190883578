//! Immutable bundle of everything derived from one data load

use serde::Serialize;
use tracing::{debug, info};

use crate::aggregate::{aggregate, Aggregation};
use crate::parser::parse_csv;
use crate::schema::{Normalized, SessionSchema};
use crate::threshold::first_warm_year;
use crate::turbidity::{summarize_turbidity, TurbiditySummary};
use crate::types::{WaterQualityRecord, WeatherRecord, YearRange, YearlyAverage};
use crate::views::{self, CombinedSeries, MonthlySeries, ViewResult, YearlySeries};
use crate::CoreResult;

/// Rows excluded per source during normalization
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RejectionCounts {
    pub weather: usize,
    #[serde(rename = "waterQuality")]
    pub water_quality: usize,
}

/// Aggregated tables for one load. Built once, never mutated; a reload
/// produces a new session.
#[derive(Debug, Clone)]
pub struct DataSession {
    weather: Vec<WeatherRecord>,
    water_quality: Vec<WaterQualityRecord>,
    aggregation: Aggregation,
    first_warm_year: Option<YearlyAverage>,
    year_range: YearRange,
    turbidity: TurbiditySummary,
    rejected: RejectionCounts,
}

impl DataSession {
    /// Derive every table from normalized records
    pub fn build(weather: Vec<WeatherRecord>, water_quality: Vec<WaterQualityRecord>) -> Self {
        let aggregation = aggregate(&weather);
        let first_warm_year = first_warm_year(&aggregation.yearly);
        let year_range = YearRange::from_years(weather.iter().map(|r| r.year));
        let turbidity = summarize_turbidity(&water_quality);

        Self {
            weather,
            water_quality,
            aggregation,
            first_warm_year,
            year_range,
            turbidity,
            rejected: RejectionCounts::default(),
        }
    }

    /// Parse, normalize and aggregate both CSV sources
    pub fn from_csv(weather_csv: &str, water_quality_csv: &str, schema: &SessionSchema) -> CoreResult<Self> {
        let weather_rows = parse_csv(weather_csv)?;
        let water_rows = parse_csv(water_quality_csv)?;

        let weather = crate::weather::normalize_weather(&weather_rows, &schema.weather);
        let water = crate::water_quality::normalize_water_quality(&water_rows, &schema.water_quality);

        log_rejections("weather", &weather);
        log_rejections("water quality", &water);

        let rejected = RejectionCounts {
            weather: weather.rejected.len(),
            water_quality: water.rejected.len(),
        };

        let mut session = Self::build(weather.records, water.records);
        session.rejected = rejected;

        info!(
            weather_records = session.weather.len(),
            water_quality_records = session.water_quality.len(),
            years = session.aggregation.yearly.len(),
            min_year = session.year_range.min,
            max_year = session.year_range.max,
            "Data session built"
        );

        Ok(session)
    }

    pub fn weather(&self) -> &[WeatherRecord] {
        &self.weather
    }

    pub fn water_quality(&self) -> &[WaterQualityRecord] {
        &self.water_quality
    }

    pub fn aggregation(&self) -> &Aggregation {
        &self.aggregation
    }

    pub fn first_warm_year(&self) -> Option<YearlyAverage> {
        self.first_warm_year
    }

    pub fn year_range(&self) -> YearRange {
        self.year_range
    }

    pub fn turbidity(&self) -> &TurbiditySummary {
        &self.turbidity
    }

    pub fn rejected(&self) -> RejectionCounts {
        self.rejected
    }

    /// Most recent year with weather data
    pub fn default_year(&self) -> i32 {
        self.year_range.max
    }

    pub fn clamp_year(&self, year: i32) -> i32 {
        self.year_range.clamp(year)
    }

    pub fn monthly_series(&self, year: i32) -> ViewResult<MonthlySeries> {
        views::monthly_series(&self.aggregation.yearly_rows, year)
    }

    pub fn yearly_series(&self) -> YearlySeries {
        views::yearly_series(&self.aggregation.yearly, self.first_warm_year)
    }

    pub fn combined_series(&self, year: i32) -> ViewResult<CombinedSeries> {
        views::combined_series(&self.aggregation.yearly_rows, year)
    }
}

fn log_rejections<T>(source: &str, normalized: &Normalized<T>) {
    if normalized.rejected.is_empty() {
        return;
    }
    for err in &normalized.rejected {
        debug!(source, error = %err, "Row excluded");
    }
    debug!(
        source,
        kept = normalized.records.len(),
        rejected = normalized.rejected.len(),
        "Normalization finished with exclusions"
    );
}
