use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::announce::{AnnouncementEmitter, LogSubscriber, Subscriber, WebhookSubscriber};
use crate::app::Result;
use crate::config::Config;
use crate::dedup::DedupGate;
use crate::fetcher::{FeedFetcher, Fetcher, HttpFetcher};
use crate::image::ImageCache;
use crate::selector::ItemSelector;

/// Everything a cycle needs, owned in one place and shared through an `Arc`.
///
/// Each piece of mutable state has a single writer: the image cache mutates
/// the image handle and the cycle's dedup step mutates the gate.
pub struct AppContext {
    pub feed_url: String,
    pub feed_fetcher: FeedFetcher,
    pub selector: ItemSelector,
    pub images: ImageCache,
    pub emitter: AnnouncementEmitter,
    dedup: Mutex<DedupGate>,
}

impl AppContext {
    pub fn new(config: &Config) -> Result<Self> {
        let http = HttpFetcher::new(&config.http)?;

        let mut subscribers: Vec<Arc<dyn Subscriber>> = vec![Arc::new(LogSubscriber)];
        if let Some(url) = &config.webhook.url {
            subscribers.push(Arc::new(WebhookSubscriber::new(http.client().clone(), url)?));
        }

        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(http);
        Ok(Self::with_fetcher(
            config,
            fetcher,
            AnnouncementEmitter::new(subscribers),
        ))
    }

    pub fn with_fetcher(
        config: &Config,
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        emitter: AnnouncementEmitter,
    ) -> Self {
        Self {
            feed_url: config.feed.url.clone(),
            feed_fetcher: FeedFetcher::new(fetcher.clone()),
            selector: ItemSelector::new(config.feed.exclude_titles.clone()),
            images: ImageCache::new(&config.image.name, fetcher),
            emitter,
            dedup: Mutex::new(DedupGate::new()),
        }
    }

    pub fn last_announced(&self) -> Option<String> {
        self.dedup().last_announced().map(ToOwned::to_owned)
    }

    /// Exclusive access to the dedup state. Never hold across an `.await`.
    pub(crate) fn dedup(&self) -> MutexGuard<'_, DedupGate> {
        self.dedup.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
