use chrono::{DateTime, Datelike, Duration, Utc};

use crate::utils::time::month_start;

/// Canonical reporting windows relative to "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// Unbounded start, end = now.
    Total,
    /// First instant of the current calendar month to now.
    Monthly,
    /// The trailing seven days.
    Weekly,
}

impl Period {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "total" => Some(Period::Total),
            "monthly" => Some(Period::Monthly),
            "weekly" => Some(Period::Weekly),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Total => "total",
            Period::Monthly => "monthly",
            Period::Weekly => "weekly",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Period::Total => "TOP 10 All-Time Pollos",
            Period::Monthly => "TOP 10 Monthly Pollos",
            Period::Weekly => "TOP 10 Weekly Pollos",
        }
    }

    /// Half-open window `[start, end)` for this period ending at `now`.
    /// `None` start means unbounded.
    pub fn window(&self, now: DateTime<Utc>) -> (Option<DateTime<Utc>>, DateTime<Utc>) {
        match self {
            Period::Total => (None, now),
            Period::Monthly => (Some(month_start(now.year(), now.month())), now),
            Period::Weekly => (Some(now - Duration::days(7)), now),
        }
    }
}
