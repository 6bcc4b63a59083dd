//! Retention policy: two calendar months of data are guaranteed to be kept;
//! anything older is purged on the scheduler's trigger day, one whole month
//! at a time.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use tracing::{debug, error, info};

use crate::service::Service;
use crate::utils::time::{month_start, months_back};

/// Month scheduled for deletion: two calendar months before `today`'s month,
/// with correct year rollover.
pub fn month_to_clear(today: NaiveDate) -> (i32, u32) {
    months_back(today.year(), today.month(), 2)
}

/// Safety guard: purge only when at least `margin_days` have elapsed since
/// the start of the month to clear. 58 days guarantees one full elapsed month
/// beyond the naive two-months-back calculation even for short months or a
/// skewed clock, so data still inside the retention window is never deleted
/// early.
pub fn purge_allowed(today: NaiveDate, year: i32, month: u32, margin_days: i64) -> bool {
    let start = month_start(year, month).date_naive();
    (today - start).num_days() >= margin_days
}

/// Scheduler sub-step, always run strictly after the month's report has been
/// delivered. A guard miss is a silent no-op; purge failures are logged and
/// the next trigger day is the natural retry.
pub async fn run(service: &Service, today: NaiveDate) {
    let (year, month) = month_to_clear(today);
    if !purge_allowed(today, year, month, service.config.retention_margin_days) {
        debug!(year, month, "retention margin not reached, skipping purge");
        return;
    }

    let store = Arc::clone(&service.store);
    match tokio::task::spawn_blocking(move || store.purge_month(year, month)).await {
        Ok(Ok(deleted)) => info!(year, month, deleted, "purged pollos for retired month"),
        Ok(Err(e)) => error!("retention purge failed: {e}"),
        Err(e) => error!("retention task failed: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};

    use crate::config::Config;
    use crate::db::store::{EventStore, QueryFilter};
    use crate::delivery::{Delivery, ImageArtifact};
    use crate::errors::AppResult;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    struct NullDelivery;

    #[async_trait]
    impl Delivery for NullDelivery {
        async fn send(&self, _: i64, _: &str, _: Option<&ImageArtifact>) -> AppResult<()> {
            Ok(())
        }
    }

    /// Service over an in-memory store holding one January 2025 event.
    fn service_with_january_event(margin_days: i64) -> Service {
        let store = Arc::new(EventStore::open_in_memory().unwrap());
        store
            .record_at(1, "ana", 7, Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap())
            .unwrap();
        let cfg = Config {
            guild_id: 7,
            target_channel_id: 1,
            report_channel_id: 2,
            retention_margin_days: margin_days,
            ..Config::default()
        };
        Service::new(cfg, store, Arc::new(NullDelivery))
    }

    #[test]
    fn month_to_clear_walks_two_months_back() {
        assert_eq!(month_to_clear(date(2025, 3, 2)), (2025, 1));
        assert_eq!(month_to_clear(date(2025, 1, 2)), (2024, 11));
        assert_eq!(month_to_clear(date(2025, 2, 2)), (2024, 12));
    }

    #[test]
    fn guard_blocks_at_57_days_and_opens_at_58() {
        // 2025-01-01 + 57 days = 2025-02-27; + 58 days = 2025-02-28.
        assert!(!purge_allowed(date(2025, 2, 27), 2025, 1, 58));
        assert!(purge_allowed(date(2025, 2, 28), 2025, 1, 58));
    }

    #[test]
    fn guard_respects_a_custom_margin() {
        assert!(purge_allowed(date(2025, 1, 11), 2025, 1, 10));
        assert!(!purge_allowed(date(2025, 1, 10), 2025, 1, 10));
    }

    #[tokio::test]
    async fn run_keeps_a_month_still_inside_the_retention_window() {
        // 2025-02-27 is 57 days after January's start; the month up for
        // deletion is December 2024, so the January row must survive.
        let service = service_with_january_event(58);
        run(&service, date(2025, 2, 27)).await;

        let rows = service.store.query(7, &QueryFilter::default()).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn run_deletes_the_retired_month_once_the_margin_elapses() {
        // 2025-03-02 is 60 days after January's start; January is two months
        // back and past the margin, so its rows are deleted.
        let service = service_with_january_event(58);
        run(&service, date(2025, 3, 2)).await;

        assert!(service
            .store
            .query(7, &QueryFilter::default())
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn run_is_a_no_op_while_the_guard_is_closed() {
        // Same date, wider margin: the guard blocks and nothing is deleted.
        let service = service_with_january_event(61);
        run(&service, date(2025, 3, 2)).await;

        let rows = service.store.query(7, &QueryFilter::default()).unwrap();
        assert_eq!(rows.len(), 1);
    }
}
