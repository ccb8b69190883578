//! Core data types for weather and water-quality observations

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// English three-letter month abbreviations, January first
pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Year range used when no weather data has been loaded
pub const DEFAULT_YEAR_RANGE: YearRange = YearRange {
    min: 1950,
    max: 2024,
};

/// Abbreviation for a 1-based month number
pub fn month_name(month: u32) -> Option<&'static str> {
    month
        .checked_sub(1)
        .and_then(|idx| MONTH_NAMES.get(idx as usize))
        .copied()
}

/// 1-based month number for an abbreviation (case-insensitive)
pub fn month_number(name: &str) -> Option<u32> {
    MONTH_NAMES
        .iter()
        .position(|m| m.eq_ignore_ascii_case(name))
        .map(|idx| idx as u32 + 1)
}

/// A single weather observation, temperature already in Fahrenheit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherRecord {
    pub date: NaiveDate,
    pub year: i32,
    /// 1..=12
    pub month: u32,
    #[serde(rename = "temperatureF")]
    pub temperature_f: f64,
}

/// A single water-quality sample with cleaned turbidity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WaterQualityRecord {
    pub date: NaiveDate,
    pub year: i32,
    /// 1..=12
    pub month: u32,
    /// Always >= 0
    #[serde(rename = "turbidityNTU")]
    pub turbidity_ntu: f64,
}

/// Mean temperature of one (year, month) pair
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyAverage {
    pub year: i32,
    pub month: u32,
    #[serde(rename = "avgTempF")]
    pub avg_temp_f: f64,
    #[serde(rename = "monthName")]
    pub month_name: String,
}

/// Per-year row holding each month's average in calendar order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct YearlyRow {
    pub year: i32,
    #[serde(rename = "avgTempF")]
    pub avg_temp_f: f64,
    /// Index 0 is January; `None` when the month had no records
    pub months: [Option<f64>; 12],
}

impl YearlyRow {
    /// Average for a 1-based month number
    pub fn value_by_number(&self, month: u32) -> Option<f64> {
        month
            .checked_sub(1)
            .and_then(|idx| self.months.get(idx as usize))
            .copied()
            .flatten()
    }

    /// Average for a month abbreviation such as `"Jan"`
    pub fn value_by_name(&self, name: &str) -> Option<f64> {
        month_number(name).and_then(|m| self.value_by_number(m))
    }

    /// Number of months carrying a value
    pub fn observed_months(&self) -> usize {
        self.months.iter().filter(|m| m.is_some()).count()
    }
}

/// Mean-of-means temperature for one year
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct YearlyAverage {
    pub year: i32,
    #[serde(rename = "avgTempF")]
    pub avg_temp_f: f64,
}

/// Inclusive range of years present in the weather data
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl YearRange {
    /// Range spanned by `years`, or [`DEFAULT_YEAR_RANGE`] if empty
    pub fn from_years<I>(years: I) -> Self
    where
        I: IntoIterator<Item = i32>,
    {
        let mut iter = years.into_iter();
        let Some(first) = iter.next() else {
            return DEFAULT_YEAR_RANGE;
        };
        let (min, max) = iter.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y)));
        Self { min, max }
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.min..=self.max).contains(&year)
    }

    /// Bound a user-selected year to this range
    pub fn clamp(&self, year: i32) -> i32 {
        year.clamp(self.min, self.max)
    }
}

impl Default for YearRange {
    fn default() -> Self {
        DEFAULT_YEAR_RANGE
    }
}
