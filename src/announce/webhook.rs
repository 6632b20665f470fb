use async_trait::async_trait;
use reqwest::Client;

use crate::announce::Subscriber;
use crate::app::{BrightError, Result};
use crate::domain::AnnouncementPayload;

/// POSTs each announcement as JSON to an automation endpoint.
pub struct WebhookSubscriber {
    client: Client,
    url: String,
}

impl WebhookSubscriber {
    pub fn new(client: Client, url: &str) -> Result<Self> {
        url::Url::parse(url)?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl Subscriber for WebhookSubscriber {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn deliver(&self, payload: &AnnouncementPayload) -> Result<()> {
        let response = self
            .client
            .post(&self.url)
            .json(&payload.to_event_json())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BrightError::Delivery {
                subscriber: self.name().to_string(),
                reason: format!("HTTP {} from {}", status, self.url),
            });
        }

        Ok(())
    }
}
