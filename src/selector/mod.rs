use crate::domain::FeedItem;

/// Picks the item to announce from a freshly fetched feed.
///
/// The feed is newest-first, so the first item wins unless its title carries
/// one of the exclusion markers, in which case the second item is used. Only
/// one item is ever skipped.
#[derive(Debug, Clone, Default)]
pub struct ItemSelector {
    exclusions: Vec<String>,
}

impl ItemSelector {
    pub fn new(exclusions: Vec<String>) -> Self {
        Self {
            exclusions: exclusions.into_iter().filter(|e| !e.is_empty()).collect(),
        }
    }

    /// Case-sensitive substring match against the exclusion list.
    pub fn is_excluded(&self, item: &FeedItem) -> bool {
        !item.title.is_empty() && self.exclusions.iter().any(|m| item.title.contains(m.as_str()))
    }

    pub fn select<'a>(&self, items: &'a [FeedItem]) -> Option<&'a FeedItem> {
        let first = items.first()?;
        if !self.is_excluded(first) {
            return Some(first);
        }

        tracing::debug!(title = %first.title, "skipping excluded item");
        items.get(1)
    }
}
