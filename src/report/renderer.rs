//! Report rendering. The text summary is always produced; the raster image
//! is delegated to a pluggable backend and any backend failure degrades the
//! report to text-only. A render error never propagates past this module.

use tracing::warn;

use crate::delivery::ImageArtifact;
use crate::errors::AppResult;
use crate::models::leaderboard::LeaderboardEntry;
use crate::report::aggregator::TOP_LIMIT;

#[derive(Debug)]
pub struct RenderedReport {
    pub text: String,
    pub image: Option<ImageArtifact>,
}

/// Pixel drawing stays outside the core. Implementations turn a ranked
/// leaderboard into a raster artifact.
pub trait ImageBackend: Send + Sync {
    fn draw(&self, title: &str, entries: &[LeaderboardEntry]) -> AppResult<ImageArtifact>;
}

pub struct Renderer {
    image: Option<Box<dyn ImageBackend>>,
}

impl Renderer {
    pub fn text_only() -> Self {
        Self { image: None }
    }

    pub fn with_image_backend(backend: Box<dyn ImageBackend>) -> Self {
        Self {
            image: Some(backend),
        }
    }

    pub fn render(&self, title: &str, entries: &[LeaderboardEntry]) -> RenderedReport {
        let text = render_text(title, entries);
        let image = self.image.as_ref().and_then(|backend| {
            match backend.draw(title, entries) {
                Ok(artifact) => Some(artifact),
                Err(e) => {
                    warn!("image render failed, degrading to text-only report: {e}");
                    None
                }
            }
        });
        RenderedReport { text, image }
    }
}

/// Plain-text ranked summary: one `#rank: name with N Pollos` line per entry,
/// at most ten rows.
pub fn render_text(title: &str, entries: &[LeaderboardEntry]) -> String {
    let mut out = format!("**👑 {}! 👑**\n\n", title.to_uppercase());
    for (i, entry) in entries.iter().take(TOP_LIMIT).enumerate() {
        out.push_str(&format!(
            "**#{}:** {} with **{}** Pollos.\n",
            i + 1,
            entry.username,
            entry.total
        ));
    }
    out
}
