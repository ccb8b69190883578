//! Monthly turbidity summaries with gap filling for nearly-complete years

use std::collections::BTreeMap;
use std::io;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aggregate::Accumulator;
use crate::parser::CsvResult;
use crate::types::{month_name, WaterQualityRecord};

/// Years missing more months than this are dropped from the summary
pub const MAX_MISSING_MONTHS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurbidityMonth {
    pub year: i32,
    pub month: u32,
    #[serde(rename = "monthName")]
    pub month_name: String,
    #[serde(rename = "turbidityNTU")]
    pub turbidity_ntu: f64,
    /// True when the month had no samples and was filled from its neighbours
    pub interpolated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroppedYear {
    pub year: i32,
    #[serde(rename = "missingMonths")]
    pub missing_months: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TurbiditySummary {
    /// Ascending by (year, month), twelve entries per complete year
    pub months: Vec<TurbidityMonth>,
    #[serde(rename = "completeYears")]
    pub complete_years: Vec<i32>,
    #[serde(rename = "droppedYears")]
    pub dropped_years: Vec<DroppedYear>,
}

impl TurbiditySummary {
    pub fn is_complete_year(&self, year: i32) -> bool {
        self.complete_years.binary_search(&year).is_ok()
    }

    pub fn year(&self, year: i32) -> Vec<&TurbidityMonth> {
        self.months.iter().filter(|m| m.year == year).collect()
    }

    /// Export as `Year,Month,Turbidity,Interpolated,MonthName`
    pub fn write_csv<W: io::Write>(&self, writer: W) -> CsvResult<()> {
        let mut out = csv::Writer::from_writer(writer);
        out.write_record(["Year", "Month", "Turbidity", "Interpolated", "MonthName"])?;
        for m in &self.months {
            out.write_record([
                m.year.to_string(),
                m.month.to_string(),
                m.turbidity_ntu.to_string(),
                m.interpolated.to_string(),
                m.month_name.clone(),
            ])?;
        }
        out.flush()?;
        Ok(())
    }
}

/// Average samples per month, then keep and gap-fill the nearly-complete years
pub fn summarize_turbidity(records: &[WaterQualityRecord]) -> TurbiditySummary {
    let mut groups: BTreeMap<i32, [Accumulator; 12]> = BTreeMap::new();
    for record in records {
        let Some(idx) = record.month.checked_sub(1).map(|m| m as usize) else {
            continue;
        };
        if let Some(acc) = groups.entry(record.year).or_default().get_mut(idx) {
            acc.add(record.turbidity_ntu);
        }
    }

    let mut summary = TurbiditySummary::default();

    for (year, accumulators) in groups {
        let observed: [Option<f64>; 12] = std::array::from_fn(|i| accumulators[i].result());
        let missing_months = observed.iter().filter(|v| v.is_none()).count();

        if missing_months > MAX_MISSING_MONTHS {
            debug!(year, missing_months, "Dropping turbidity year");
            summary.dropped_years.push(DroppedYear {
                year,
                missing_months,
            });
            continue;
        }

        let filled = interpolate_months(&observed);
        for (idx, value) in filled.into_iter().enumerate() {
            let month = idx as u32 + 1;
            let Some(turbidity_ntu) = value else {
                continue;
            };
            summary.months.push(TurbidityMonth {
                year,
                month,
                month_name: month_name(month).unwrap_or_default().to_string(),
                turbidity_ntu,
                interpolated: observed[idx].is_none(),
            });
        }
        summary.complete_years.push(year);
    }

    summary
}

/// Fill gaps linearly between observed neighbours; edges take the nearest value.
///
/// A slice with no observed values is returned unchanged.
pub fn interpolate_months<const N: usize>(observed: &[Option<f64>; N]) -> [Option<f64>; N] {
    let mut filled = *observed;
    for i in 0..N {
        if filled[i].is_some() {
            continue;
        }
        let before = (0..i).rev().find_map(|j| observed[j].map(|v| (j, v)));
        let after = (i + 1..N).find_map(|j| observed[j].map(|v| (j, v)));

        filled[i] = match (before, after) {
            (Some((j0, v0)), Some((j1, v1))) => {
                let t = (i - j0) as f64 / (j1 - j0) as f64;
                Some(v0 + (v1 - v0) * t)
            }
            (Some((_, v)), None) | (None, Some((_, v))) => Some(v),
            (None, None) => None,
        };
    }
    filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample(year: i32, month: u32, turbidity_ntu: f64) -> WaterQualityRecord {
        WaterQualityRecord {
            date: NaiveDate::from_ymd_opt(year, month, 1).unwrap(),
            year,
            month,
            turbidity_ntu,
        }
    }

    fn full_year_except(year: i32, skip: &[u32]) -> Vec<WaterQualityRecord> {
        (1..=12)
            .filter(|m| !skip.contains(m))
            .map(|m| sample(year, m, f64::from(m) / 10.0))
            .collect()
    }

    #[test]
    fn test_interpolate_interior_and_edges() {
        let observed = [None, Some(1.0), None, None, Some(4.0), None];
        let filled = interpolate_months(&observed);
        let expected = [1.0, 1.0, 2.0, 3.0, 4.0, 4.0];

        for (got, want) in filled.iter().zip(expected) {
            assert!((got.unwrap() - want).abs() < 1e-9, "{got:?} != {want}");
        }
    }

    #[test]
    fn test_interpolate_all_missing_is_unchanged() {
        let observed: [Option<f64>; 3] = [None, None, None];
        assert_eq!(interpolate_months(&observed), observed);
    }

    #[test]
    fn test_monthly_mean_of_samples() {
        let mut records = full_year_except(2015, &[]);
        records.push(sample(2015, 1, 0.3));
        let summary = summarize_turbidity(&records);

        let jan = &summary.year(2015)[0];
        assert!((jan.turbidity_ntu - 0.2).abs() < 1e-9);
        assert!(!jan.interpolated);
    }

    #[test]
    fn test_year_with_three_gaps_is_filled() {
        let summary = summarize_turbidity(&full_year_except(2010, &[2, 3, 12]));

        assert_eq!(summary.complete_years, vec![2010]);
        let months = summary.year(2010);
        assert_eq!(months.len(), 12);

        let interpolated: Vec<u32> = months.iter().filter(|m| m.interpolated).map(|m| m.month).collect();
        assert_eq!(interpolated, vec![2, 3, 12]);
        // Feb sits one third of the way from Jan (0.1) to Apr (0.4)
        assert!((months[1].turbidity_ntu - 0.2).abs() < 1e-9);
        // Dec takes Nov's value
        assert!((months[11].turbidity_ntu - 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_year_with_four_gaps_is_dropped() {
        let mut records = full_year_except(2005, &[1, 2, 3, 4]);
        records.extend(full_year_except(2006, &[]));
        let summary = summarize_turbidity(&records);

        assert_eq!(summary.complete_years, vec![2006]);
        assert_eq!(
            summary.dropped_years,
            vec![DroppedYear {
                year: 2005,
                missing_months: 4
            }]
        );
        assert!(summary.year(2005).is_empty());
        assert!(summary.is_complete_year(2006));
        assert!(!summary.is_complete_year(2005));
    }

    #[test]
    fn test_write_csv() {
        let summary = summarize_turbidity(&full_year_except(2020, &[6]));
        let mut buf = Vec::new();
        summary.write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Year,Month,Turbidity,Interpolated,MonthName");
        assert_eq!(lines.len(), 13);
        assert_eq!(lines[1], "2020,1,0.1,false,Jan");
        assert!(lines[6].starts_with("2020,6,"));
        assert!(lines[6].ends_with(",true,Jun"));
    }

    struct BrokenPipe;

    impl io::Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }
    }

    #[test]
    fn test_write_csv_reports_io_failure() {
        let summary = summarize_turbidity(&full_year_except(2020, &[]));

        let err = summary.write_csv(BrokenPipe).unwrap_err();
        assert!(matches!(err, crate::parser::CsvError::Io(_)));
    }
}
