use std::path::Path;
use std::sync::Arc;

use crate::announce::AnnouncementEmitter;
use crate::app::{AppContext, BrightError, Result};
use crate::config::{Config, ConfigError};
use crate::cycle::{self, CycleOutcome};
use crate::daemon::{shutdown_signal, PollScheduler, SchedulerConfig};
use crate::fetcher::{Fetcher, HttpFetcher};

/// Apply command-line overrides on top of the loaded config.
pub fn apply_overrides(
    config: &mut Config,
    interval: Option<String>,
    feed_url: Option<String>,
    no_initial_check: bool,
) -> std::result::Result<(), ConfigError> {
    if let Some(interval) = interval {
        config.poll.interval = interval;
    }
    if let Some(url) = feed_url {
        config.feed.url = url;
    }
    if no_initial_check {
        config.poll.run_on_start = false;
    }
    config.validate()
}

pub async fn run(config: &Config) -> Result<()> {
    let ctx = Arc::new(AppContext::new(config)?);
    let scheduler = Arc::new(PollScheduler::new(ctx, SchedulerConfig::from_config(config)?));

    let signal_scheduler = scheduler.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        signal_scheduler.stop();
    });

    scheduler.run().await;
    Ok(())
}

/// Run a single cycle without subscribers and print the outcome.
pub async fn check(config: &Config) -> Result<()> {
    let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::new(&config.http)?);
    let ctx = AppContext::with_fetcher(config, fetcher, AnnouncementEmitter::default());

    match cycle::run_cycle(&ctx).await? {
        CycleOutcome::NoItem => println!("No eligible item in {}", ctx.feed_url),
        CycleOutcome::Duplicate { pub_date } => println!("Already announced: {}", pub_date),
        CycleOutcome::Announced(payload) => {
            let json = serde_json::to_string_pretty(&payload.to_event_json())
                .map_err(|e| BrightError::Other(e.to_string()))?;
            println!("{}", json);
            if let Some(bytes) = payload.image.bytes() {
                println!("Image: {} bytes from {}", bytes.len(), payload.image_url);
            }
        }
    }

    Ok(())
}

pub fn show_config(path: &Path, config: &Config) -> Result<()> {
    let rendered =
        toml::to_string_pretty(config).map_err(|e| BrightError::Config(e.to_string()))?;
    println!("# {}", path.display());
    println!("{}", rendered);
    Ok(())
}
