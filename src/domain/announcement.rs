use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::domain::FeedItem;
use crate::image::ImageHandle;

/// Name of the event every subscriber receives.
pub const NEW_ARTICLE_EVENT: &str = "new_article";

/// Payload of a `new_article` event.
///
/// `image` points at the shared handle owned by the image cache. The next
/// refresh replaces its content, so subscribers that need the bytes must
/// read them while handling the event.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementPayload {
    pub title: String,
    pub link: String,
    pub content: String,
    pub pub_date: String,
    pub image_url: String,
    #[serde(serialize_with = "serialize_image")]
    pub image: Arc<ImageHandle>,
}

impl AnnouncementPayload {
    pub fn new(item: &FeedItem, image: Arc<ImageHandle>) -> Self {
        Self {
            title: item.title.clone(),
            link: item.link.clone(),
            content: item.content.clone(),
            pub_date: item.published_at.clone(),
            image_url: item.image_url.clone(),
            image,
        }
    }

    /// Event envelope as sent over the wire.
    pub fn to_event_json(&self) -> serde_json::Value {
        serde_json::json!({
            "event": NEW_ARTICLE_EVENT,
            "data": self,
        })
    }
}

fn serialize_image<S: Serializer>(image: &Arc<ImageHandle>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(image.name())
}
