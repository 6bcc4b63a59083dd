//! Delivery boundary: posts a rendered report (text plus optional image
//! artifact) to a channel. Sends are fire-and-forget; callers log failures
//! and never retry, the next scheduled or requested report is the recovery.

use async_trait::async_trait;

use crate::errors::AppResult;

/// Raster artifact produced by an image backend, ready to attach to a send.
#[derive(Debug, Clone)]
pub struct ImageArtifact {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[async_trait]
pub trait Delivery: Send + Sync {
    async fn send(
        &self,
        channel_id: i64,
        text: &str,
        image: Option<&ImageArtifact>,
    ) -> AppResult<()>;
}

/// Webhook implementation: JSON for text-only sends, multipart when an image
/// artifact is attached.
pub struct WebhookDelivery {
    url: String,
    client: reqwest::Client,
}

impl WebhookDelivery {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Delivery for WebhookDelivery {
    async fn send(
        &self,
        channel_id: i64,
        text: &str,
        image: Option<&ImageArtifact>,
    ) -> AppResult<()> {
        match image {
            None => {
                let payload = serde_json::json!({
                    "channel_id": channel_id,
                    "content": text,
                });
                self.client
                    .post(&self.url)
                    .json(&payload)
                    .send()
                    .await?
                    .error_for_status()?;
            }
            Some(artifact) => {
                let form = reqwest::multipart::Form::new()
                    .text("channel_id", channel_id.to_string())
                    .text("content", text.to_string())
                    .part(
                        "file",
                        reqwest::multipart::Part::bytes(artifact.bytes.clone())
                            .file_name(artifact.filename.clone()),
                    );
                self.client
                    .post(&self.url)
                    .multipart(form)
                    .send()
                    .await?
                    .error_for_status()?;
            }
        }
        Ok(())
    }
}
