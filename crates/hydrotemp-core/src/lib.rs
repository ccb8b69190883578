//! Core data pipeline for the temperature/turbidity dashboard
//!
//! Raw CSV text is parsed into header-keyed rows, normalized into typed
//! weather and water-quality records, aggregated into monthly and yearly
//! tables, and projected into the per-year series the charts render.

pub mod aggregate;
pub mod dates;
pub mod fallback;
pub mod parser;
pub mod schema;
pub mod session;
pub mod threshold;
pub mod turbidity;
pub mod types;
pub mod units;
pub mod views;
pub mod water_quality;
pub mod weather;

pub use aggregate::{aggregate, Aggregation};
pub use fallback::{generate as generate_fallback, SyntheticMonth, SyntheticYear, COMPLETE_DATA_YEARS};
pub use parser::{parse_csv, CellValue, CsvError, RawRecord};
pub use schema::{Normalized, RecordError, SessionSchema, WaterQualitySchema, WeatherSchema};
pub use session::{DataSession, RejectionCounts};
pub use threshold::{first_warm_year, first_year_above, WARM_THRESHOLD_F};
pub use turbidity::{summarize_turbidity, TurbidityMonth, TurbiditySummary};
pub use types::*;
pub use views::{
    CombinedPoint, CombinedSeries, MonthPoint, MonthlySeries, ScatterPoint, SeriesOrigin,
    TurbidityBasis, ViewError, YearlySeries,
};
pub use water_quality::normalize_water_quality;
pub use weather::normalize_weather;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Csv(#[from] CsvError),
}

pub type CoreResult<T> = Result<T, CoreError>;
