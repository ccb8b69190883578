//! Weather source normalization: Kelvin observations to dated Fahrenheit records

use chrono::Datelike;

use crate::dates::parse_general_date;
use crate::parser::{CellValue, RawRecord};
use crate::schema::{Normalized, RecordError, WeatherSchema};
use crate::types::WeatherRecord;
use crate::units::kelvin_to_fahrenheit;

/// Normalize raw weather rows, preserving input order
pub fn normalize_weather(rows: &[RawRecord], schema: &WeatherSchema) -> Normalized<WeatherRecord> {
    Normalized::from_results(rows.iter().map(|row| normalize_row(row, schema)))
}

fn normalize_row(row: &RawRecord, schema: &WeatherSchema) -> Result<WeatherRecord, RecordError> {
    let kelvin = match row.get(&schema.kelvin_field) {
        None | Some(CellValue::Empty) => {
            return Err(RecordError::MissingField {
                line: row.line,
                field: schema.kelvin_field.clone(),
            })
        }
        Some(cell) => cell.as_f64().ok_or_else(|| RecordError::NotNumeric {
            line: row.line,
            field: schema.kelvin_field.clone(),
        })?,
    };

    let time = row
        .get(&schema.time_field)
        .and_then(CellValue::to_text)
        .ok_or_else(|| RecordError::MissingField {
            line: row.line,
            field: schema.time_field.clone(),
        })?;

    let date = parse_general_date(&time).ok_or(RecordError::InvalidDate {
        line: row.line,
        value: time,
    })?;

    Ok(WeatherRecord {
        date,
        year: date.year(),
        month: date.month(),
        temperature_f: kelvin_to_fahrenheit(kelvin),
    })
}
