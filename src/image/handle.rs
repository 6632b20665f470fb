use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use bytes::{Bytes, BytesMut};
use futures::StreamExt;

use crate::app::{BrightError, Result};
use crate::fetcher::{ByteStream, Fetcher};

#[derive(Debug, Default)]
struct ImageState {
    source: Option<String>,
    content: Option<Bytes>,
    revision: u64,
}

/// The named image exposed to subscribers.
///
/// Filling the handle happens in two phases:
///
/// 1. [`set_source`](Self::set_source) points the handle at a URL. It never
///    blocks and never fails.
/// 2. [`drain`](Self::drain) downloads the source and stores the bytes. This
///    is where network failures show up.
///
/// Consumers that prefer streaming can call [`stream`](Self::stream), which
/// opens a fresh download of whatever the source is at that moment.
pub struct ImageHandle {
    name: String,
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    state: RwLock<ImageState>,
}

impl ImageHandle {
    pub(crate) fn new(name: &str, fetcher: Arc<dyn Fetcher + Send + Sync>) -> Self {
        Self {
            name: name.to_string(),
            fetcher,
            state: RwLock::new(ImageState::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// URL the content is currently produced from.
    pub fn source(&self) -> Option<String> {
        self.read_state(|s| s.source.clone())
    }

    /// Bumped on every `set_source`.
    pub fn revision(&self) -> u64 {
        self.read_state(|s| s.revision)
    }

    pub fn is_populated(&self) -> bool {
        self.read_state(|s| s.content.is_some())
    }

    /// Last successfully drained content for the current source.
    pub fn bytes(&self) -> Option<Bytes> {
        self.read_state(|s| s.content.clone())
    }

    /// Replace the content source. Blank URLs clear it.
    pub fn set_source(&self, url: &str) {
        let url = url.trim();
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.source = if url.is_empty() {
            None
        } else {
            Some(url.to_string())
        };
        state.content = None;
        state.revision += 1;
    }

    /// Open a download of the current source.
    pub async fn stream(&self) -> Result<ByteStream> {
        let url = self.source().ok_or_else(|| BrightError::ImageFetch {
            url: String::new(),
            reason: format!("image '{}' has no source", self.name),
        })?;

        self.fetcher
            .stream(&url)
            .await
            .map_err(|e| image_error(&url, e))
    }

    /// Download the current source completely and keep the bytes.
    ///
    /// If `set_source` is called while the download runs, the bytes are
    /// returned but not stored, since they no longer match the source.
    pub async fn drain(&self) -> Result<Bytes> {
        let (url, revision) = self.read_state(|s| (s.source.clone(), s.revision));
        let url = url.unwrap_or_default();

        let mut stream = self.stream().await?;
        let mut buf = BytesMut::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| image_error(&url, e))?;
            buf.extend_from_slice(&chunk);
        }
        let bytes = buf.freeze();

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if state.revision == revision {
            state.content = Some(bytes.clone());
        } else {
            tracing::debug!(image = %self.name, url = %url, "source replaced during drain, discarding");
        }

        Ok(bytes)
    }

    fn read_state<T>(&self, f: impl FnOnce(&ImageState) -> T) -> T {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }
}

impl fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("ImageHandle")
            .field("name", &self.name)
            .field("source", &state.source)
            .field("revision", &state.revision)
            .field("populated", &state.content.is_some())
            .finish()
    }
}

fn image_error(url: &str, err: BrightError) -> BrightError {
    match err {
        BrightError::ImageFetch { .. } => err,
        other => BrightError::ImageFetch {
            url: url.to_string(),
            reason: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::stub::StubFetcher;

    fn handle_with(stub: Arc<StubFetcher>) -> ImageHandle {
        ImageHandle::new("test-image", stub)
    }

    #[test]
    fn test_set_source_is_synchronous_and_clears_content() {
        let stub = Arc::new(StubFetcher::new());
        let handle = handle_with(stub.clone());

        handle.set_source("http://img/1.png");
        assert_eq!(handle.source().as_deref(), Some("http://img/1.png"));
        assert_eq!(handle.revision(), 1);
        assert!(!handle.is_populated());
        assert_eq!(stub.calls_to("http://img/1.png"), 0);
    }

    #[test]
    fn test_blank_source_clears() {
        let handle = handle_with(Arc::new(StubFetcher::new()));
        handle.set_source("http://img/1.png");
        handle.set_source("  ");
        assert_eq!(handle.source(), None);
        assert_eq!(handle.revision(), 2);
    }

    #[tokio::test]
    async fn test_drain_stores_bytes() {
        let stub = Arc::new(StubFetcher::new());
        stub.respond("http://img/1.png", b"\x89PNG-image-bytes".to_vec());
        let handle = handle_with(stub.clone());

        handle.set_source("http://img/1.png");
        let bytes = handle.drain().await.unwrap();

        assert_eq!(&bytes[..], b"\x89PNG-image-bytes");
        assert!(handle.is_populated());
        assert_eq!(handle.bytes(), Some(bytes));
        assert_eq!(stub.calls_to("http://img/1.png"), 1);
    }

    #[tokio::test]
    async fn test_drain_failure_is_image_fetch_error() {
        let stub = Arc::new(StubFetcher::new());
        stub.fail("http://img/broken.png", "404 Not Found");
        let handle = handle_with(stub);

        handle.set_source("http://img/broken.png");
        let err = handle.drain().await.unwrap_err();

        match err {
            BrightError::ImageFetch { url, reason } => {
                assert_eq!(url, "http://img/broken.png");
                assert!(reason.contains("404"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!handle.is_populated());
    }

    #[tokio::test]
    async fn test_stream_without_source_fails() {
        let handle = handle_with(Arc::new(StubFetcher::new()));
        assert!(matches!(
            handle.stream().await,
            Err(BrightError::ImageFetch { .. })
        ));
    }

    #[tokio::test]
    async fn test_stream_reads_current_source() {
        let stub = Arc::new(StubFetcher::new());
        stub.respond("http://img/a.png", b"aaaa-aaaa".to_vec());
        stub.respond("http://img/b.png", b"bb".to_vec());
        let handle = handle_with(stub);

        handle.set_source("http://img/a.png");
        handle.set_source("http://img/b.png");

        let chunks: Vec<_> = handle.stream().await.unwrap().collect().await;
        let body: Vec<u8> = chunks
            .into_iter()
            .flat_map(|c| c.unwrap().to_vec())
            .collect();
        assert_eq!(body, b"bb");
    }
}
