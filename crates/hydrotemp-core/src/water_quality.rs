//! Water-quality source normalization: sample dates and cleaned turbidity

use chrono::Datelike;

use crate::dates::{is_slash_date, parse_general_date, parse_us_date};
use crate::parser::RawRecord;
use crate::schema::{Normalized, RecordError, WaterQualitySchema};
use crate::types::WaterQualityRecord;

/// Normalize raw water-quality rows, preserving input order
pub fn normalize_water_quality(
    rows: &[RawRecord],
    schema: &WaterQualitySchema,
) -> Normalized<WaterQualityRecord> {
    Normalized::from_results(rows.iter().map(|row| normalize_row(row, schema)))
}

fn normalize_row(
    row: &RawRecord,
    schema: &WaterQualitySchema,
) -> Result<WaterQualityRecord, RecordError> {
    let required = |field: &String| {
        row.get(field)
            .and_then(|cell| cell.to_text())
            .ok_or_else(|| RecordError::MissingField {
                line: row.line,
                field: field.clone(),
            })
    };

    let sample_date = required(&schema.sample_date_field)?;
    let raw_turbidity = required(&schema.turbidity_field)?;

    let date = parse_sample_date(&sample_date).ok_or(RecordError::InvalidDate {
        line: row.line,
        value: sample_date,
    })?;

    let turbidity_ntu = clean_turbidity(&raw_turbidity).ok_or(RecordError::InvalidTurbidity {
        line: row.line,
        value: raw_turbidity,
    })?;

    Ok(WaterQualityRecord {
        date,
        year: date.year(),
        month: date.month(),
        turbidity_ntu,
    })
}

/// `MM/DD/YYYY` when the value has three slash parts, any general format otherwise
pub fn parse_sample_date(value: &str) -> Option<chrono::NaiveDate> {
    if is_slash_date(value) {
        parse_us_date(value)
    } else {
        parse_general_date(value)
    }
}

/// Strip everything but digits and `.`, then read the leading decimal.
///
/// Annotated values like `"<0.10"` or `"0.45 NTU"` keep their number; values
/// with no digits left (`"N/A"`, `""`, `"."`) yield `None`, never zero.
pub fn clean_turbidity(value: &str) -> Option<f64> {
    let cleaned: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let prefix = leading_decimal(&cleaned);
    if !prefix.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    prefix.parse::<f64>().ok()
}

// Input holds only digits and dots; the number ends at the second dot
fn leading_decimal(s: &str) -> &str {
    let end = s
        .char_indices()
        .filter(|&(_, c)| c == '.')
        .nth(1)
        .map(|(idx, _)| idx)
        .unwrap_or(s.len());
    &s[..end]
}
