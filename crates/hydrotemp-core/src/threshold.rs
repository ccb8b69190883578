//! First-year threshold search over yearly averages

use crate::types::YearlyAverage;

/// Yearly mean temperature that marks a "warm" year (°F)
pub const WARM_THRESHOLD_F: f64 = 55.0;

/// First entry whose average is strictly above `threshold`.
///
/// Scans in the given order; callers pass the list sorted ascending by year
/// to get the earliest such year.
pub fn first_year_above(yearly: &[YearlyAverage], threshold: f64) -> Option<YearlyAverage> {
    yearly.iter().find(|y| y.avg_temp_f > threshold).copied()
}

/// First year whose average exceeds [`WARM_THRESHOLD_F`]
pub fn first_warm_year(yearly: &[YearlyAverage]) -> Option<YearlyAverage> {
    first_year_above(yearly, WARM_THRESHOLD_F)
}
