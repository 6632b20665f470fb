use serde::{Deserialize, Serialize};

/// One entry of the polled feed, as it appeared in the latest fetch.
///
/// Every field is plain text. Missing values are empty strings so downstream
/// code never has to distinguish "absent" from "blank".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub content: String,
    /// Publication timestamp exactly as written in the feed document.
    pub published_at: String,
    /// Enclosure or media URL, empty when the entry carries no image.
    pub image_url: String,
}
