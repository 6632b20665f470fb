use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use reqwest::Client;

use crate::app::{BrightError, Result};
use crate::config::HttpConfig;
use crate::fetcher::{ByteStream, Fetcher};

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .brotli(true)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { client })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes> {
        let response = self.client.get(url).send().await?;
        response.error_for_status_ref()?;

        Ok(response.bytes().await?)
    }

    async fn stream(&self, url: &str) -> Result<ByteStream> {
        let response = self.client.get(url).send().await?;
        response.error_for_status_ref()?;

        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map_err(BrightError::from))
            .boxed())
    }
}
