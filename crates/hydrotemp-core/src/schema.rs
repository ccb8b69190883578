//! Column schemas for the two input sources and typed row rejections

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_WEATHER_TIME: &str = "time";
pub const DEFAULT_WEATHER_KELVIN: &str = "Ktemp";
pub const DEFAULT_SAMPLE_DATE: &str = "Sample Date";
pub const DEFAULT_TURBIDITY: &str = "Turbidity (NTU)";

/// Column names required from the weather source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherSchema {
    pub time_field: String,
    pub kelvin_field: String,
}

impl Default for WeatherSchema {
    fn default() -> Self {
        Self {
            time_field: DEFAULT_WEATHER_TIME.to_string(),
            kelvin_field: DEFAULT_WEATHER_KELVIN.to_string(),
        }
    }
}

/// Column names required from the water-quality source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaterQualitySchema {
    pub sample_date_field: String,
    pub turbidity_field: String,
}

impl Default for WaterQualitySchema {
    fn default() -> Self {
        Self {
            sample_date_field: DEFAULT_SAMPLE_DATE.to_string(),
            turbidity_field: DEFAULT_TURBIDITY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSchema {
    pub weather: WeatherSchema,
    pub water_quality: WaterQualitySchema,
}

/// Why a single row was excluded from its output set
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("line {line}: missing required field '{field}'")]
    MissingField { line: u64, field: String },

    #[error("line {line}: field '{field}' is not numeric")]
    NotNumeric { line: u64, field: String },

    #[error("line {line}: unparseable date '{value}'")]
    InvalidDate { line: u64, value: String },

    #[error("line {line}: no turbidity value in '{value}'")]
    InvalidTurbidity { line: u64, value: String },
}

impl RecordError {
    pub fn line(&self) -> u64 {
        match self {
            RecordError::MissingField { line, .. }
            | RecordError::NotNumeric { line, .. }
            | RecordError::InvalidDate { line, .. }
            | RecordError::InvalidTurbidity { line, .. } => *line,
        }
    }
}

/// Output of a normalizer: accepted records in input order plus rejections
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized<T> {
    pub records: Vec<T>,
    pub rejected: Vec<RecordError>,
}

impl<T> Normalized<T> {
    pub fn from_results<I>(results: I) -> Self
    where
        I: IntoIterator<Item = Result<T, RecordError>>,
    {
        let mut records = Vec::new();
        let mut rejected = Vec::new();
        for result in results {
            match result {
                Ok(record) => records.push(record),
                Err(e) => rejected.push(e),
            }
        }
        Self { records, rejected }
    }
}
