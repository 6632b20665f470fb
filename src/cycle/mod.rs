//! One poll cycle: fetch → select → image refresh → dedup → announce.

use chrono::Utc;
use tracing::{debug, error, info};

use crate::app::{AppContext, Result};
use crate::domain::AnnouncementPayload;

#[derive(Debug, Clone)]
pub enum CycleOutcome {
    /// The feed had no eligible item.
    NoItem,
    /// The selected item was already announced.
    Duplicate { pub_date: String },
    Announced(AnnouncementPayload),
}

/// Run one cycle and report what happened.
///
/// Errors from the feed fetch or the image refresh end the cycle before the
/// dedup state is touched. Delivery runs detached and cannot fail the cycle.
pub async fn run_cycle(ctx: &AppContext) -> Result<CycleOutcome> {
    let items = ctx.feed_fetcher.fetch(&ctx.feed_url).await?;

    let Some(item) = ctx.selector.select(&items).cloned() else {
        debug!(count = items.len(), "no eligible item in feed");
        return Ok(CycleOutcome::NoItem);
    };
    debug!(title = %item.title, pub_date = %item.published_at, "got latest item");

    let image = ctx.images.refresh(&item.image_url).await?;

    let payload = {
        let mut gate = ctx.dedup();
        if !gate.should_announce(&item.published_at) {
            debug!(pub_date = %item.published_at, "article already announced, skipping");
            return Ok(CycleOutcome::Duplicate {
                pub_date: item.published_at,
            });
        }

        let payload = AnnouncementPayload::new(&item, image);
        info!(title = %item.title, pub_date = %item.published_at, "announcing new article");
        ctx.emitter.dispatch(payload.clone());
        gate.commit(&item.published_at);
        payload
    };

    Ok(CycleOutcome::Announced(payload))
}

/// [`run_cycle`] with errors logged and swallowed.
pub async fn check(ctx: &AppContext) -> Option<CycleOutcome> {
    let start = Utc::now();
    let result = run_cycle(ctx).await;
    let elapsed_ms = Utc::now().signed_duration_since(start).num_milliseconds();

    match result {
        Ok(outcome) => {
            debug!(elapsed_ms, "feed check complete");
            Some(outcome)
        }
        Err(e) => {
            error!(url = %ctx.feed_url, error = %e, elapsed_ms, "feed check failed");
            None
        }
    }
}
