/// Remembers the publication timestamp of the last announced item.
///
/// Comparison is on the raw text: two spellings of the same instant count as
/// different items, and an older timestamp is as "new" as a newer one.
#[derive(Debug, Clone, Default)]
pub struct DedupGate {
    last_announced: Option<String>,
}

impl DedupGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// An item without a timestamp arrives here as `""`. "Nothing announced
    /// yet" is kept distinct from "announced an undated item", so a fresh gate
    /// admits `""` once and later undated items are duplicates of it.
    pub fn should_announce(&self, candidate: &str) -> bool {
        self.last_announced.as_deref() != Some(candidate)
    }

    pub fn commit(&mut self, candidate: &str) {
        self.last_announced = Some(candidate.to_string());
    }

    pub fn last_announced(&self) -> Option<&str> {
        self.last_announced.as_deref()
    }
}
