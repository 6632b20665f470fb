pub mod feed;
pub mod http_fetcher;
#[cfg(test)]
pub(crate) mod stub;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;

use crate::app::Result;

pub use feed::FeedFetcher;
pub use http_fetcher::HttpFetcher;

/// Body chunks of a response, yielded as they arrive.
pub type ByteStream = BoxStream<'static, Result<Bytes>>;

#[async_trait]
pub trait Fetcher {
    /// Download the whole body of `url`.
    async fn fetch(&self, url: &str) -> Result<Bytes>;

    /// Start a download of `url` and hand back its body as a stream.
    ///
    /// Errors before the first chunk (connection, HTTP status) are returned
    /// here; errors while reading surface as stream items.
    async fn stream(&self, url: &str) -> Result<ByteStream>;
}
