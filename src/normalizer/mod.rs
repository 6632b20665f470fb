use feed_rs::parser;
use html_escape::decode_html_entities;

use crate::app::{BrightError, Result};
use crate::domain::FeedItem;

#[derive(Debug, Clone, Default)]
pub struct FeedMeta {
    pub title: Option<String>,
}

/// Turns a raw feed document into [`FeedItem`]s, keeping document order.
///
/// RSS goes through the `rss` crate so `pubDate` stays byte-for-byte what the
/// publisher wrote. Its XML reader already unescapes titles, so they are taken
/// as-is. Anything else (Atom, JSON Feed) is handed to `feed-rs`.
#[derive(Clone)]
pub struct Normalizer;

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&self, body: &[u8]) -> Result<(FeedMeta, Vec<FeedItem>)> {
        match rss::Channel::read_from(body) {
            Ok(channel) => Ok(Self::from_rss(&channel)),
            Err(rss_err) => {
                tracing::debug!(error = %rss_err, "not an RSS document, trying feed-rs");
                let feed = parser::parse(body)
                    .map_err(|e| BrightError::FeedParse(e.to_string()))?;
                Ok(Self::from_feed_rs(feed))
            }
        }
    }

    fn from_rss(channel: &rss::Channel) -> (FeedMeta, Vec<FeedItem>) {
        let meta = FeedMeta {
            title: non_empty(channel.title()).map(str::to_string),
        };

        let items = channel
            .items()
            .iter()
            .map(|item| FeedItem {
                title: item.title().unwrap_or_default().to_string(),
                link: item.link().unwrap_or_default().to_string(),
                content: item
                    .description()
                    .or(item.content())
                    .unwrap_or_default()
                    .to_string(),
                published_at: item.pub_date().unwrap_or_default().to_string(),
                image_url: rss_image_url(item).unwrap_or_default(),
            })
            .collect();

        (meta, items)
    }

    fn from_feed_rs(feed: feed_rs::model::Feed) -> (FeedMeta, Vec<FeedItem>) {
        let meta = FeedMeta {
            title: feed.title.map(|t| decode(&t.content)),
        };

        let items = feed
            .entries
            .into_iter()
            .map(|entry| {
                let link = entry
                    .links
                    .iter()
                    .find(|l| l.rel.as_deref().map_or(true, |rel| rel == "alternate"))
                    .or(entry.links.first())
                    .map(|l| l.href.clone())
                    .unwrap_or_default();

                let image_url = entry
                    .media
                    .iter()
                    .flat_map(|m| m.content.iter())
                    .find_map(|c| c.url.as_ref().map(|u| u.to_string()))
                    .or_else(|| {
                        entry
                            .links
                            .iter()
                            .find(|l| l.rel.as_deref() == Some("enclosure"))
                            .map(|l| l.href.clone())
                    })
                    .unwrap_or_default();

                let content = entry
                    .summary
                    .map(|s| s.content)
                    .or_else(|| entry.content.and_then(|c| c.body))
                    .unwrap_or_default();

                FeedItem {
                    title: entry.title.map(|t| decode(&t.content)).unwrap_or_default(),
                    link,
                    content,
                    published_at: entry
                        .published
                        .or(entry.updated)
                        .map(|dt| dt.to_rfc3339())
                        .unwrap_or_default(),
                    image_url,
                }
            })
            .collect();

        (meta, items)
    }
}

/// Enclosure first, then `media:content` / `media:thumbnail`.
fn rss_image_url(item: &rss::Item) -> Option<String> {
    if let Some(enclosure) = item.enclosure() {
        if !enclosure.url().is_empty() {
            return Some(enclosure.url().to_string());
        }
    }

    let media = item.extensions().get("media")?;
    ["content", "thumbnail"]
        .iter()
        .filter_map(|name| media.get(*name))
        .flatten()
        .find_map(|ext| ext.attrs().get("url").cloned())
}

fn decode(s: &str) -> String {
    decode_html_entities(s).to_string()
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
