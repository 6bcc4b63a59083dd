//! Explicit service state: configuration plus the store and boundary handles,
//! constructed once at startup and passed by reference. No ambient singletons.

use std::sync::Arc;

use chrono::Utc;
use tracing::error;

use crate::config::Config;
use crate::db::store::EventStore;
use crate::delivery::{Delivery, ImageArtifact};
use crate::errors::{AppError, AppResult};
use crate::ingest::Reactor;
use crate::models::leaderboard::LeaderboardEntry;
use crate::models::period::Period;
use crate::report::aggregator::Aggregator;
use crate::report::renderer::Renderer;

pub struct Service {
    pub config: Config,
    pub store: Arc<EventStore>,
    pub delivery: Arc<dyn Delivery>,
    pub renderer: Renderer,
    pub reactor: Option<Arc<dyn Reactor>>,
}

impl Service {
    pub fn new(config: Config, store: Arc<EventStore>, delivery: Arc<dyn Delivery>) -> Self {
        Self {
            config,
            store,
            delivery,
            renderer: Renderer::text_only(),
            reactor: None,
        }
    }

    pub fn with_renderer(mut self, renderer: Renderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_reactor(mut self, reactor: Arc<dyn Reactor>) -> Self {
        self.reactor = Some(reactor);
        self
    }

    pub fn aggregator(&self) -> Aggregator {
        Aggregator::new(Arc::clone(&self.store))
    }

    /// On-demand leaderboard for a slash command. Storage failures degrade to
    /// an empty board after logging; the reporting path never crashes.
    pub async fn top_report(
        &self,
        guild_id: i64,
        period: Period,
    ) -> (String, Vec<LeaderboardEntry>) {
        let agg = self.aggregator();
        let now = Utc::now();
        let entries =
            match tokio::task::spawn_blocking(move || agg.top(guild_id, period, now)).await {
                Ok(Ok(rows)) => rows,
                Ok(Err(e)) => {
                    error!("leaderboard query failed: {e}");
                    Vec::new()
                }
                Err(e) => {
                    error!("leaderboard task failed: {e}");
                    Vec::new()
                }
            };
        (period.title().to_string(), entries)
    }

    /// Query, render and deliver an on-demand leaderboard to `channel_id`.
    pub async fn deliver_top_report(&self, guild_id: i64, period: Period, channel_id: i64) {
        let (title, entries) = self.top_report(guild_id, period).await;
        if entries.is_empty() {
            let notice = format!("No Pollos found for the **{}** period.", period.as_str());
            self.deliver(channel_id, &notice, None).await;
            return;
        }
        let report = self.renderer.render(&title, &entries);
        self.deliver(channel_id, &report.text, report.image.as_ref())
            .await;
    }

    /// All-time total for one user, 0 when absent or when the query fails.
    pub async fn user_report(&self, guild_id: i64, user_id: i64) -> i64 {
        let agg = self.aggregator();
        match tokio::task::spawn_blocking(move || agg.user_total(guild_id, user_id)).await {
            Ok(Ok(total)) => total,
            Ok(Err(e)) => {
                error!("user total query failed: {e}");
                0
            }
            Err(e) => {
                error!("user total task failed: {e}");
                0
            }
        }
    }

    /// Administrative reset: deletes every event for the guild. Returns the
    /// number of rows removed.
    pub async fn reset(&self, guild_id: i64) -> AppResult<usize> {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || store.purge_all(guild_id))
            .await
            .map_err(|e| AppError::Other(e.to_string()))?
    }

    /// Fire-and-forget send through the delivery boundary. Failures are
    /// logged, never retried.
    pub async fn deliver(&self, channel_id: i64, text: &str, image: Option<&ImageArtifact>) {
        if let Err(e) = self.delivery.send(channel_id, text, image).await {
            error!(channel = channel_id, "report delivery failed: {e}");
        }
    }
}
