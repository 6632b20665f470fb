//! The single reusable image resource.
//!
//! [`ImageCache`] creates one [`ImageHandle`] the first time it is asked for
//! an image and keeps handing out that same handle afterwards, only swapping
//! the content behind it.

mod handle;

pub use handle::ImageHandle;

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::app::Result;
use crate::fetcher::Fetcher;

pub struct ImageCache {
    name: String,
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    // Held across the drain so only one refresh is in flight at a time.
    slot: Mutex<Option<Arc<ImageHandle>>>,
}

impl ImageCache {
    pub fn new(name: &str, fetcher: Arc<dyn Fetcher + Send + Sync>) -> Self {
        Self {
            name: name.to_string(),
            fetcher,
            slot: Mutex::new(None),
        }
    }

    /// Point the shared handle at `image_url` and download it.
    ///
    /// A blank URL leaves the handle without content and succeeds.
    pub async fn refresh(&self, image_url: &str) -> Result<Arc<ImageHandle>> {
        let mut slot = self.slot.lock().await;

        let handle = match slot.as_ref() {
            Some(handle) => handle.clone(),
            None => {
                info!(image = %self.name, "registering image");
                let handle = Arc::new(ImageHandle::new(&self.name, self.fetcher.clone()));
                *slot = Some(handle.clone());
                handle
            }
        };

        handle.set_source(image_url);
        if handle.source().is_none() {
            debug!(image = %self.name, "item has no image, handle left empty");
            return Ok(handle);
        }

        debug!(image = %self.name, url = %image_url, "setting image");
        match handle.drain().await {
            Ok(bytes) => {
                debug!(image = %self.name, size = bytes.len(), "image populated");
                Ok(handle)
            }
            Err(e) => {
                warn!(image = %self.name, error = %e, "failed to populate image");
                Err(e)
            }
        }
    }

    /// The handle, if one has been created yet.
    pub async fn handle(&self) -> Option<Arc<ImageHandle>> {
        self.slot.lock().await.clone()
    }
}
