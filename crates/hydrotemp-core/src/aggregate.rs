//! Monthly and yearly temperature rollups
//!
//! Yearly figures are means of the monthly means, so every observed month
//! weighs the same regardless of how many samples it had.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{month_name, MonthlyAverage, WeatherRecord, YearlyAverage, YearlyRow};
use crate::units::{mean, round_to};

/// Running mean over a group of values
#[derive(Debug, Clone, Default)]
pub struct Accumulator {
    observations: Vec<f64>,
}

impl Accumulator {
    pub fn add(&mut self, value: f64) {
        self.observations.push(value);
    }

    pub fn result(&self) -> Option<f64> {
        mean(&self.observations)
    }
}

/// All temperature tables derived from one set of weather records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Aggregation {
    /// Ascending by (year, month)
    pub monthly: Vec<MonthlyAverage>,
    /// Ascending by year
    pub yearly_rows: Vec<YearlyRow>,
    /// Ascending by year
    pub yearly: Vec<YearlyAverage>,
}

impl Aggregation {
    pub fn row_for_year(&self, year: i32) -> Option<&YearlyRow> {
        self.yearly_rows
            .binary_search_by_key(&year, |row| row.year)
            .ok()
            .map(|idx| &self.yearly_rows[idx])
    }
}

/// Group records by (year, month) and average each group
pub fn monthly_averages(records: &[WeatherRecord]) -> Vec<MonthlyAverage> {
    let mut groups: BTreeMap<(i32, u32), Accumulator> = BTreeMap::new();
    for record in records {
        groups
            .entry((record.year, record.month))
            .or_default()
            .add(record.temperature_f);
    }

    groups
        .into_iter()
        .filter_map(|((year, month), acc)| {
            Some(MonthlyAverage {
                year,
                month,
                avg_temp_f: round_to(acc.result()?, 2),
                month_name: month_name(month)?.to_string(),
            })
        })
        .collect()
}

fn group_by_year(monthly: &[MonthlyAverage]) -> BTreeMap<i32, Vec<&MonthlyAverage>> {
    let mut years: BTreeMap<i32, Vec<&MonthlyAverage>> = BTreeMap::new();
    for entry in monthly {
        years.entry(entry.year).or_default().push(entry);
    }
    for months in years.values_mut() {
        months.sort_by_key(|m| m.month);
    }
    years
}

fn mean_of_means(months: &[&MonthlyAverage]) -> Option<f64> {
    let values: Vec<f64> = months.iter().map(|m| m.avg_temp_f).collect();
    mean(&values).map(|v| round_to(v, 2))
}

/// One row per year with each month's average in its calendar slot
pub fn yearly_rows(monthly: &[MonthlyAverage]) -> Vec<YearlyRow> {
    group_by_year(monthly)
        .into_iter()
        .filter_map(|(year, months)| {
            let mut slots = [None; 12];
            for m in &months {
                if let Some(slot) = m.month.checked_sub(1).and_then(|i| slots.get_mut(i as usize)) {
                    *slot = Some(m.avg_temp_f);
                }
            }
            Some(YearlyRow {
                year,
                avg_temp_f: mean_of_means(&months)?,
                months: slots,
            })
        })
        .collect()
}

/// Yearly mean-of-means, sorted ascending by year
pub fn yearly_averages(monthly: &[MonthlyAverage]) -> Vec<YearlyAverage> {
    let mut yearly: Vec<YearlyAverage> = group_by_year(monthly)
        .into_iter()
        .filter_map(|(year, months)| {
            Some(YearlyAverage {
                year,
                avg_temp_f: mean_of_means(&months)?,
            })
        })
        .collect();
    yearly.sort_by_key(|y| y.year);
    yearly
}

/// Build every temperature table from normalized weather records
pub fn aggregate(records: &[WeatherRecord]) -> Aggregation {
    let monthly = monthly_averages(records);
    let yearly_rows = yearly_rows(&monthly);
    let yearly = yearly_averages(&monthly);
    Aggregation {
        monthly,
        yearly_rows,
        yearly,
    }
}
