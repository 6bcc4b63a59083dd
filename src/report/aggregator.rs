//! Read-side convenience layer over the event store: canonical windows and
//! top-10 truncation. Pure reads, never mutates.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::db::store::{EventStore, QueryFilter};
use crate::errors::AppResult;
use crate::models::leaderboard::LeaderboardEntry;
use crate::models::period::Period;
use crate::utils::time::{month_start, next_month};

/// Leaderboards are truncated to this many entries.
pub const TOP_LIMIT: usize = 10;

pub struct Aggregator {
    store: Arc<EventStore>,
}

impl Aggregator {
    pub fn new(store: Arc<EventStore>) -> Self {
        Self { store }
    }

    /// Top entries for one of the canonical periods, ending at `now`.
    pub fn top(
        &self,
        guild_id: i64,
        period: Period,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<LeaderboardEntry>> {
        let (start, end) = period.window(now);
        let mut rows = self.store.query(
            guild_id,
            &QueryFilter {
                start,
                end: Some(end),
                user_id: None,
            },
        )?;
        rows.truncate(TOP_LIMIT);
        Ok(rows)
    }

    /// Top entries for one specific calendar month. Used by the scheduler for
    /// the "last month" report.
    pub fn month(&self, guild_id: i64, year: i32, month: u32) -> AppResult<Vec<LeaderboardEntry>> {
        let start = month_start(year, month);
        let (ny, nm) = next_month(year, month);
        let mut rows = self.store.query(
            guild_id,
            &QueryFilter {
                start: Some(start),
                end: Some(month_start(ny, nm)),
                user_id: None,
            },
        )?;
        rows.truncate(TOP_LIMIT);
        Ok(rows)
    }

    /// All-time total for a single user, 0 when the user has no events.
    pub fn user_total(&self, guild_id: i64, user_id: i64) -> AppResult<i64> {
        let rows = self.store.query(
            guild_id,
            &QueryFilter {
                user_id: Some(user_id),
                ..QueryFilter::default()
            },
        )?;
        Ok(rows.first().map(|e| e.total).unwrap_or(0))
    }
}
