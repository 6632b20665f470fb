use async_trait::async_trait;
use tracing::info;

use crate::announce::Subscriber;
use crate::app::Result;
use crate::domain::{AnnouncementPayload, NEW_ARTICLE_EVENT};

/// Writes every announcement to the log.
pub struct LogSubscriber;

#[async_trait]
impl Subscriber for LogSubscriber {
    fn name(&self) -> &str {
        "log"
    }

    async fn deliver(&self, payload: &AnnouncementPayload) -> Result<()> {
        info!(
            event = NEW_ARTICLE_EVENT,
            title = %payload.title,
            link = %payload.link,
            pub_date = %payload.pub_date,
            image_url = %payload.image_url,
            image = payload.image.name(),
            "new article"
        );
        Ok(())
    }
}
