//! Daily report scheduler: wakes every 24 hours and, on the configured
//! trigger day, delivers last month's leaderboard to the report channel and
//! then hands the same tick to the retention manager.
//!
//! There is deliberately no catch-up: if the process is down on the trigger
//! day, that month's report is skipped. Known limitation, kept as-is.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use tracing::{error, info};

use crate::errors::{AppError, AppResult};
use crate::schedule::retention;
use crate::service::Service;
use crate::utils::time::{month_label, prev_month};

const TICK_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Pure decision: does the monthly report fire for this date?
pub fn should_run_today(date: NaiveDate, trigger_day: u32) -> bool {
    date.day() == trigger_day
}

/// 24-hour loop. Each tick body is isolated so one failed month does not
/// cancel future ticks.
pub async fn run(service: Arc<Service>) {
    let mut interval = tokio::time::interval(TICK_INTERVAL);
    loop {
        interval.tick().await;
        if let Err(e) = tick(&service, Utc::now()).await {
            error!("scheduler tick failed: {e}");
        }
    }
}

/// One scheduler wake. The report for last calendar month is generated and
/// delivered strictly before the retention purge runs; if the report query
/// fails, the purge is skipped for this tick as well.
pub async fn tick(service: &Service, now: DateTime<Utc>) -> AppResult<()> {
    let today = now.date_naive();
    if !should_run_today(today, service.config.trigger_day) {
        return Ok(());
    }

    let (year, month) = prev_month(today.year(), today.month());
    let guild_id = service.config.guild_id;
    info!(year, month, "trigger day reached, building monthly report");

    let agg = service.aggregator();
    let entries = tokio::task::spawn_blocking(move || agg.month(guild_id, year, month))
        .await
        .map_err(|e| AppError::Other(e.to_string()))??;

    let label = month_label(year, month);
    if entries.is_empty() {
        let notice = format!("No Pollos were recorded in {label}.");
        service
            .deliver(service.config.report_channel_id, &notice, None)
            .await;
    } else {
        let title = format!("TOP 10 Pollos - Monthly Report {label}");
        let report = service.renderer.render(&title, &entries);
        service
            .deliver(
                service.config.report_channel_id,
                &report.text,
                report.image.as_ref(),
            )
            .await;
    }

    retention::run(service, today).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn fires_only_on_the_trigger_day() {
        assert!(!should_run_today(date(2025, 5, 1), 2));
        assert!(should_run_today(date(2025, 5, 2), 2));
        assert!(!should_run_today(date(2025, 5, 3), 2));
        assert!(!should_run_today(date(2025, 5, 31), 2));
    }

    #[test]
    fn trigger_day_is_configurable() {
        assert!(should_run_today(date(2025, 5, 15), 15));
        assert!(!should_run_today(date(2025, 5, 15), 2));
    }
}
