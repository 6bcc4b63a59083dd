//! Calendar month arithmetic shared by the store, the aggregator and the
//! scheduler. Month boundaries are always computed from the calendar, never
//! from a fixed day offset, so December wraps to January and month lengths
//! are irrelevant.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// First instant of the given calendar month, UTC.
pub fn month_start(year: i32, month: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0).unwrap()
}

/// The month after `(year, month)`.
pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

/// The month immediately before `(year, month)`.
pub fn prev_month(year: i32, month: u32) -> (i32, u32) {
    months_back(year, month, 1)
}

/// Walk `n` calendar months back from `(year, month)`.
pub fn months_back(year: i32, month: u32, n: u32) -> (i32, u32) {
    let total = year * 12 + month as i32 - 1 - n as i32;
    (total.div_euclid(12), (total.rem_euclid(12) + 1) as u32)
}

/// Human-readable label like "January 2025".
pub fn month_label(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_else(|| format!("{year}-{month:02}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn previous_month_wraps_january_to_december() {
        assert_eq!(prev_month(2025, 1), (2024, 12));
        assert_eq!(prev_month(2025, 6), (2025, 5));
    }

    #[test]
    fn two_months_back_wraps_the_year() {
        assert_eq!(months_back(2025, 1, 2), (2024, 11));
        assert_eq!(months_back(2025, 2, 2), (2024, 12));
        assert_eq!(months_back(2025, 3, 2), (2025, 1));
    }

    #[test]
    fn next_month_wraps_december() {
        assert_eq!(next_month(2025, 12), (2026, 1));
        assert_eq!(next_month(2025, 4), (2025, 5));
    }

    #[test]
    fn month_start_is_midnight_on_the_first() {
        let start = month_start(2025, 2);
        assert_eq!(start.to_rfc3339(), "2025-02-01T00:00:00+00:00");
    }

    #[test]
    fn month_label_formats_english_month_names() {
        assert_eq!(month_label(2025, 1), "January 2025");
        assert_eq!(month_label(2024, 12), "December 2024");
    }
}
