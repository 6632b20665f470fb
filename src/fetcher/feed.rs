use std::sync::Arc;

use crate::app::{BrightError, Result};
use crate::domain::FeedItem;
use crate::fetcher::Fetcher;
use crate::normalizer::Normalizer;

/// Downloads the feed document and normalizes it into items.
///
/// There is no retry here; the next scheduled poll is the retry.
#[derive(Clone)]
pub struct FeedFetcher {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    normalizer: Normalizer,
}

impl FeedFetcher {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>) -> Self {
        Self {
            fetcher,
            normalizer: Normalizer::new(),
        }
    }

    pub async fn fetch(&self, url: &str) -> Result<Vec<FeedItem>> {
        let body = self
            .fetcher
            .fetch(url)
            .await
            .map_err(|e| BrightError::Fetch {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let (meta, items) = self.normalizer.normalize(&body)?;
        tracing::debug!(
            url,
            feed = meta.title.as_deref().unwrap_or(url),
            count = items.len(),
            "fetched feed"
        );

        Ok(items)
    }
}
