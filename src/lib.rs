//! pollotally library root.
//! Event store, aggregation, scheduling and report plumbing for the pollo
//! counter bot. The chat gateway, command registration and pixel drawing
//! stay outside this crate and reach the core through the trait boundaries
//! in `ingest`, `delivery` and `report::renderer`.

pub mod config;
pub mod db;
pub mod delivery;
pub mod errors;
pub mod ingest;
pub mod models;
pub mod report;
pub mod schedule;
pub mod service;
pub mod utils;

use std::sync::Arc;

use tracing::info;

use config::Config;
use db::store::EventStore;
use delivery::{Delivery, WebhookDelivery};
use errors::{AppError, AppResult};
use service::Service;

/// Entry point used by main.rs: load and validate configuration, open the
/// store, start the daily scheduler and wait for shutdown.
pub async fn run(db_override: Option<String>) -> AppResult<()> {
    let mut cfg = Config::load()?;
    if let Some(db) = db_override {
        cfg.database = db;
    }
    cfg.validate()?;

    let store = Arc::new(EventStore::open(&cfg.database)?);
    let stats = store.stats()?;
    info!(
        db = %cfg.database,
        events = stats.total_events,
        "event store opened"
    );

    let webhook = cfg
        .webhook_url
        .clone()
        .ok_or_else(|| AppError::Config("webhook_url is not set".into()))?;
    let delivery: Arc<dyn Delivery> = Arc::new(WebhookDelivery::new(webhook));

    let service = Arc::new(Service::new(cfg, store, delivery));

    tokio::spawn(schedule::scheduler::run(Arc::clone(&service)));
    info!("daily report scheduler started");

    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    Ok(())
}
