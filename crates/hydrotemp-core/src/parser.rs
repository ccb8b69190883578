//! Header-keyed CSV parsing with per-cell type inference
//!
//! Row shape policy: rows shorter than the header are padded with
//! [`CellValue::Empty`], longer rows are truncated to the header length.
//! Rows whose cells are all blank are skipped. When two header columns
//! share a name, the rightmost column wins.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum CsvError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CsvResult<T> = Result<T, CsvError>;

/// A single cell after type inference
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Empty,
}

impl CellValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Textual form of a non-empty cell; numbers are re-rendered
    pub fn to_text(&self) -> Option<String> {
        match self {
            CellValue::Number(v) => Some(v.to_string()),
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

/// One data row keyed by header name
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// 1-based line in the source text
    pub line: u64,
    fields: HashMap<String, CellValue>,
}

impl RawRecord {
    pub fn new(line: u64, fields: HashMap<String, CellValue>) -> Self {
        Self { line, fields }
    }

    /// Cell for `field`, `None` if the column does not exist
    pub fn get(&self, field: &str) -> Option<&CellValue> {
        self.fields.get(field)
    }

    /// True if the column exists and the cell is not empty
    pub fn has_value(&self, field: &str) -> bool {
        self.get(field).is_some_and(|v| !v.is_empty())
    }
}

/// Infer the type of one raw cell
pub fn infer_cell(raw: &str) -> CellValue {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return CellValue::Empty;
    }
    match parse_number(trimmed) {
        Some(v) => CellValue::Number(v),
        None => CellValue::Text(trimmed.to_string()),
    }
}

// Rejects `inf`/`NaN` spellings that f64::from_str would otherwise accept
fn parse_number(s: &str) -> Option<f64> {
    let plausible = s
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E'));
    if !plausible {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse CSV text whose first line holds the field names
pub fn parse_csv(text: &str) -> CsvResult<Vec<RawRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Ok(Vec::new());
    }

    let mut records = Vec::new();
    let mut reshaped = 0usize;

    for result in reader.records() {
        let row = result?;

        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        if row.len() != headers.len() {
            reshaped += 1;
        }

        let line = row.position().map(|p| p.line()).unwrap_or_default();
        let fields = headers
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let value = row.get(idx).map(infer_cell).unwrap_or(CellValue::Empty);
                (name.clone(), value)
            })
            .collect();

        records.push(RawRecord::new(line, fields));
    }

    if reshaped > 0 {
        debug!(reshaped, "Padded or truncated rows to header length");
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_cell() {
        assert_eq!(infer_cell("270.5"), CellValue::Number(270.5));
        assert_eq!(infer_cell(" -4 "), CellValue::Number(-4.0));
        assert_eq!(infer_cell("1e3"), CellValue::Number(1000.0));
        assert_eq!(infer_cell(""), CellValue::Empty);
        assert_eq!(infer_cell("   "), CellValue::Empty);
        assert_eq!(infer_cell("0.45 NTU"), CellValue::Text("0.45 NTU".into()));
        assert_eq!(infer_cell("NaN"), CellValue::Text("NaN".into()));
        assert_eq!(infer_cell("inf"), CellValue::Text("inf".into()));
        assert_eq!(infer_cell("01/15/2020"), CellValue::Text("01/15/2020".into()));
    }

    #[test]
    fn test_parse_header_and_rows() {
        let text = "time,Ktemp,station\n2020-01-01 00:00:00,270.0,A\n2020-01-02 00:00:00,272.0,B\n";
        let records = parse_csv(text).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].get("time"),
            Some(&CellValue::Text("2020-01-01 00:00:00".into()))
        );
        assert_eq!(records[0].get("Ktemp"), Some(&CellValue::Number(270.0)));
        assert_eq!(records[1].get("station"), Some(&CellValue::Text("B".into())));
        assert_eq!(records[0].line, 2);
        assert_eq!(records[1].line, 3);
    }

    #[test]
    fn test_skips_blank_lines() {
        let text = "a,b\n1,2\n\n   \n,\n3,4\n";
        let records = parse_csv(text).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].get("a"), Some(&CellValue::Number(3.0)));
    }

    #[test]
    fn test_short_rows_padded_long_rows_truncated() {
        let text = "a,b,c\n1\n1,2,3,4,5\n";
        let records = parse_csv(text).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("b"), Some(&CellValue::Empty));
        assert_eq!(records[0].get("c"), Some(&CellValue::Empty));
        assert!(!records[0].has_value("c"));
        assert_eq!(records[1].get("c"), Some(&CellValue::Number(3.0)));
        assert_eq!(records[1].get("d"), None);
    }

    #[test]
    fn test_duplicate_header_last_column_wins() {
        let records = parse_csv("a,a\n1,2\n").unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("a"), Some(&CellValue::Number(2.0)));
    }

    #[test]
    fn test_empty_and_header_only_input() {
        assert!(parse_csv("").unwrap().is_empty());
        assert!(parse_csv("a,b\n").unwrap().is_empty());
    }

    #[test]
    fn test_quoted_fields() {
        let text = "Sample Date,Turbidity (NTU),Note\n01/15/2020,\"0.45\",\"has, comma\"\n";
        let records = parse_csv(text).unwrap();

        assert_eq!(records[0].get("Turbidity (NTU)"), Some(&CellValue::Number(0.45)));
        assert_eq!(
            records[0].get("Note"),
            Some(&CellValue::Text("has, comma".into()))
        );
        assert_eq!(records[0].get("Missing"), None);
    }
}
