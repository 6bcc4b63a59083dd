//! Append-only event store for counted pollos.
//!
//! One row per counted image post. Rows are inserted by the ingestion path
//! and deleted only in bulk, either a whole calendar month at a time by the
//! retention purge or per guild by the administrative reset. There is no
//! update path.

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, ToSql};

use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::leaderboard::LeaderboardEntry;
use crate::utils::time::{month_start, next_month};

/// Optional filters for a leaderboard query. Absent bounds leave that side of
/// the window unbounded; the range is half-open `[start, end)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct QueryFilter {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub user_id: Option<i64>,
}

/// Store-level counters surfaced at startup.
#[derive(Debug, Clone)]
pub struct StoreStats {
    pub total_events: i64,
    pub first_event: Option<String>,
    pub last_event: Option<String>,
}

pub struct EventStore {
    pool: DbPool,
}

impl EventStore {
    pub fn open(path: &str) -> AppResult<Self> {
        let store = Self {
            pool: DbPool::open(path)?,
        };
        store.init_schema()?;
        Ok(store)
    }

    pub fn open_in_memory() -> AppResult<Self> {
        let store = Self {
            pool: DbPool::open_in_memory()?,
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> AppResult<()> {
        self.pool.with_conn(|conn| {
            conn.execute_batch(
                "
                CREATE TABLE IF NOT EXISTS pollos (
                    id         INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id    INTEGER NOT NULL,
                    username   TEXT NOT NULL,
                    guild_id   INTEGER NOT NULL,
                    count      INTEGER NOT NULL,
                    created_at TEXT NOT NULL     -- RFC 3339 UTC timestamp
                );

                CREATE INDEX IF NOT EXISTS idx_pollos_guild_created
                    ON pollos (guild_id, created_at);
                ",
            )
        })?;
        Ok(())
    }

    /// Record one pollo. `created_at` is stamped with the store's clock, never
    /// caller-supplied, so events cannot be backdated through the public path.
    pub fn record(&self, user_id: i64, username: &str, guild_id: i64) -> AppResult<()> {
        self.record_at(user_id, username, guild_id, Utc::now())
    }

    pub(crate) fn record_at(
        &self,
        user_id: i64,
        username: &str,
        guild_id: i64,
        created_at: DateTime<Utc>,
    ) -> AppResult<()> {
        self.pool.with_conn(|conn| {
            conn.execute(
                "INSERT INTO pollos (user_id, username, guild_id, count, created_at)
                 VALUES (?1, ?2, ?3, 1, ?4)",
                params![user_id, username, guild_id, created_at.to_rfc3339()],
            )
        })?;
        Ok(())
    }

    /// Summed counts per display name for one guild, ordered by total
    /// descending. Ties fall back to first-seen order (smallest event id), so
    /// the ranking is stable across identical queries.
    pub fn query(&self, guild_id: i64, filter: &QueryFilter) -> AppResult<Vec<LeaderboardEntry>> {
        let mut sql =
            String::from("SELECT username, SUM(count) FROM pollos WHERE guild_id = ?");
        let mut values: Vec<Box<dyn ToSql>> = vec![Box::new(guild_id)];

        if let Some(user_id) = filter.user_id {
            sql.push_str(" AND user_id = ?");
            values.push(Box::new(user_id));
        }
        if let Some(start) = filter.start {
            sql.push_str(" AND created_at >= ?");
            values.push(Box::new(start.to_rfc3339()));
        }
        if let Some(end) = filter.end {
            sql.push_str(" AND created_at < ?");
            values.push(Box::new(end.to_rfc3339()));
        }
        sql.push_str(" GROUP BY username ORDER BY SUM(count) DESC, MIN(id) ASC");

        self.pool.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(&sql)?;
            let param_refs: Vec<&dyn ToSql> = values.iter().map(|v| v.as_ref()).collect();
            let rows = stmt.query_map(param_refs.as_slice(), |row| {
                Ok(LeaderboardEntry {
                    username: row.get(0)?,
                    total: row.get(1)?,
                })
            })?;
            let mut out = Vec::new();
            for r in rows {
                out.push(r?);
            }
            Ok(out)
        })
    }

    /// Delete every event inside `[first-of-month, first-of-next-month)`.
    /// Returns the number of rows deleted.
    pub fn purge_month(&self, year: i32, month: u32) -> AppResult<usize> {
        let start = month_start(year, month);
        let (ny, nm) = next_month(year, month);
        let end = month_start(ny, nm);

        let deleted = self.pool.with_conn(|conn| {
            conn.execute(
                "DELETE FROM pollos WHERE created_at >= ?1 AND created_at < ?2",
                params![start.to_rfc3339(), end.to_rfc3339()],
            )
        })?;
        Ok(deleted)
    }

    /// Administrative reset: delete every event for one guild.
    pub fn purge_all(&self, guild_id: i64) -> AppResult<usize> {
        let deleted = self.pool.with_conn(|conn| {
            conn.execute("DELETE FROM pollos WHERE guild_id = ?1", params![guild_id])
        })?;
        Ok(deleted)
    }

    pub fn stats(&self) -> AppResult<StoreStats> {
        self.pool.with_conn(|conn| {
            let total_events: i64 =
                conn.query_row("SELECT COUNT(*) FROM pollos", [], |row| row.get(0))?;
            let first_event: Option<String> = conn
                .query_row(
                    "SELECT created_at FROM pollos ORDER BY created_at ASC LIMIT 1",
                    [],
                    |row| row.get(0),
                )
                .optional()?;
            let last_event: Option<String> = conn
                .query_row(
                    "SELECT created_at FROM pollos ORDER BY created_at DESC LIMIT 1",
                    [],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(StoreStats {
                total_events,
                first_event,
                last_event,
            })
        })
    }
}
