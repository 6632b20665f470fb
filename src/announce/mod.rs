//! Delivery of `new_article` events.
//!
//! ```text
//! cycle → AnnouncementEmitter::dispatch → (broadcast channel, Subscriber…)
//! ```
//!
//! Delivery is detached from the cycle that produced the payload. A failing
//! subscriber is logged and otherwise ignored.

mod logging;
mod webhook;

pub use logging::LogSubscriber;
pub use webhook::WebhookSubscriber;

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::app::{BrightError, Result};
use crate::domain::{AnnouncementPayload, NEW_ARTICLE_EVENT};

const CHANNEL_CAPACITY: usize = 16;

/// Something that wants to hear about new articles.
#[async_trait]
pub trait Subscriber: Send + Sync {
    fn name(&self) -> &str;

    async fn deliver(&self, payload: &AnnouncementPayload) -> Result<()>;
}

/// Outcome of one publish.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Subscribers that accepted the event.
    pub delivered: usize,
    pub failed: usize,
    /// In-process channel receivers at send time.
    pub listeners: usize,
}

#[derive(Clone)]
pub struct AnnouncementEmitter {
    subscribers: Arc<Vec<Arc<dyn Subscriber>>>,
    tx: broadcast::Sender<AnnouncementPayload>,
}

impl Default for AnnouncementEmitter {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl AnnouncementEmitter {
    pub fn new(subscribers: Vec<Arc<dyn Subscriber>>) -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            subscribers: Arc::new(subscribers),
            tx,
        }
    }

    /// In-process listener. Receivers that fall behind lose old events.
    pub fn subscribe(&self) -> broadcast::Receiver<AnnouncementPayload> {
        self.tx.subscribe()
    }

    /// Deliver `payload` to the channel and every subscriber, concurrently.
    pub async fn publish(&self, payload: &AnnouncementPayload) -> DeliveryReport {
        let mut report = DeliveryReport::default();

        // No listeners is not a failure.
        report.listeners = self.tx.send(payload.clone()).unwrap_or(0);

        let results = join_all(self.subscribers.iter().map(|s| async move {
            let result = s.deliver(payload).await.map_err(|e| match e {
                BrightError::Delivery { .. } => e,
                other => BrightError::Delivery {
                    subscriber: s.name().to_string(),
                    reason: other.to_string(),
                },
            });
            (s.name(), result)
        }))
        .await;

        for (name, result) in results {
            match result {
                Ok(()) => {
                    debug!(subscriber = name, event = NEW_ARTICLE_EVENT, "delivered");
                    report.delivered += 1;
                }
                Err(e) => {
                    warn!(subscriber = name, error = %e, "failed to deliver {}", NEW_ARTICLE_EVENT);
                    report.failed += 1;
                }
            }
        }

        report
    }

    /// Publish on a detached task and return immediately.
    pub fn dispatch(&self, payload: AnnouncementPayload) -> JoinHandle<DeliveryReport> {
        let emitter = self.clone();
        tokio::spawn(async move { emitter.publish(&payload).await })
    }
}
