//! Calendar date parsing for the two source formats

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%b %d, %Y", "%B %d, %Y", "%d %b %Y"];

/// Parse a timestamp in any of the common shapes found in exported data.
///
/// Offsets are honoured as written: `2020-01-31T23:00:00-05:00` is
/// January 31st, not February 1st UTC.
pub fn parse_general_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local().date());
    }

    // Trailing "Z" without the RFC 3339 "T" separator
    let naive = value.strip_suffix('Z').unwrap_or(value);
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(naive, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(naive, fmt).ok())
        })
}

/// Parse strict `MM/DD/YYYY`.
///
/// Returns `None` when the value does not have exactly three `/`-separated
/// parts, or when the parts are not a real calendar date. A time of day
/// following the year (`01/15/2020 08:30`) is ignored.
pub fn parse_us_date(value: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = value.trim().split('/').collect();
    let [month, day, year] = parts.as_slice() else {
        return None;
    };

    let year = year.split_whitespace().next()?;
    if year.len() != 4 {
        return None;
    }

    let month: u32 = month.trim().parse().ok()?;
    let day: u32 = day.trim().parse().ok()?;
    let year: i32 = year.parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

/// True if the value has the three-part slash shape of `MM/DD/YYYY`
pub fn is_slash_date(value: &str) -> bool {
    value.trim().split('/').count() == 3
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_general_formats() {
        assert_eq!(parse_general_date("2020-01-15 06:00:00"), Some(ymd(2020, 1, 15)));
        assert_eq!(parse_general_date("2020-01-15T06:00:00"), Some(ymd(2020, 1, 15)));
        assert_eq!(parse_general_date("2020-01-15T06:00:00Z"), Some(ymd(2020, 1, 15)));
        assert_eq!(parse_general_date("2020-01-15 06:00:00Z"), Some(ymd(2020, 1, 15)));
        assert_eq!(parse_general_date("2020-01-15 06:00"), Some(ymd(2020, 1, 15)));
        assert_eq!(parse_general_date("2020-01-15"), Some(ymd(2020, 1, 15)));
        assert_eq!(parse_general_date("2020/01/15"), Some(ymd(2020, 1, 15)));
        assert_eq!(parse_general_date("Jan 15, 2020"), Some(ymd(2020, 1, 15)));
        assert_eq!(parse_general_date("January 15, 2020"), Some(ymd(2020, 1, 15)));
    }

    #[test]
    fn test_general_keeps_local_offset_date() {
        assert_eq!(
            parse_general_date("2020-01-31T23:00:00-05:00"),
            Some(ymd(2020, 1, 31))
        );
    }

    #[test]
    fn test_general_rejects_garbage() {
        assert_eq!(parse_general_date(""), None);
        assert_eq!(parse_general_date("not a date"), None);
        assert_eq!(parse_general_date("2020-13-01"), None);
    }

    #[test]
    fn test_us_date() {
        assert_eq!(parse_us_date("01/15/2020"), Some(ymd(2020, 1, 15)));
        assert_eq!(parse_us_date("1/5/2020"), Some(ymd(2020, 1, 5)));
        assert_eq!(parse_us_date("12/31/1999 23:59"), Some(ymd(1999, 12, 31)));
        assert_eq!(parse_us_date("02/30/2020"), None);
        assert_eq!(parse_us_date("01/15/20"), None);
        assert_eq!(parse_us_date("2020-01-15"), None);
        assert_eq!(parse_us_date("01/15"), None);
    }

    #[test]
    fn test_slash_shape() {
        assert!(is_slash_date("01/15/2020"));
        assert!(is_slash_date("2020/01/15"));
        assert!(!is_slash_date("2020-01-15"));
    }
}
