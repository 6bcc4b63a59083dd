//! Ingestion path: turns gateway message notifications into stored pollos.
//!
//! Recording and reacting are two decoupled steps. The insert must succeed or
//! be logged and dropped (no retry, acceptable loss for a counter of this
//! nature); reactions are best-effort side effects that fail independently.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::errors::AppResult;
use crate::service::Service;

/// Gateway notification for one message in a channel.
#[derive(Debug, Clone)]
pub struct MessageEvent {
    pub user_id: i64,
    pub username: String,
    pub guild_id: i64,
    pub channel_id: i64,
    pub has_image_attachment: bool,
}

/// Best-effort reaction hook applied after a pollo is counted.
#[async_trait]
pub trait Reactor: Send + Sync {
    async fn react(&self, channel_id: i64, emoji: &str) -> AppResult<()>;
}

/// Handle one gateway message. Only image posts in the configured target
/// channel count; everything else is ignored.
pub async fn handle_message(service: &Service, msg: &MessageEvent) {
    if msg.channel_id != service.config.target_channel_id || !msg.has_image_attachment {
        return;
    }

    let store = Arc::clone(&service.store);
    let (user_id, guild_id) = (msg.user_id, msg.guild_id);
    let username = msg.username.clone();
    match tokio::task::spawn_blocking(move || store.record(user_id, &username, guild_id)).await {
        Ok(Ok(())) => info!(user = %msg.username, guild = msg.guild_id, "pollo recorded"),
        Ok(Err(e)) => warn!("failed to record pollo, event dropped: {e}"),
        Err(e) => warn!("record task failed, event dropped: {e}"),
    }

    if let Some(reactor) = &service.reactor {
        for emoji in &service.config.reaction_emojis {
            if let Err(e) = reactor.react(msg.channel_id, emoji).await {
                warn!(emoji = %emoji, "could not add reaction: {e}");
            }
        }
    }
}
