//! # brightfeed
//!
//! Watches a single news feed and announces its newest article.
//!
//! ## Architecture
//!
//! Every poll runs one cycle:
//!
//! ```text
//! Fetcher → Normalizer → ItemSelector → ImageCache → DedupGate → AnnouncementEmitter
//! ```
//!
//! - [`fetcher`]: HTTP client and feed download
//! - [`normalizer`]: RSS/Atom documents to [`FeedItem`](domain::FeedItem)s
//! - [`selector`]: newest-item choice with title exclusions
//! - [`image`]: the single reusable article image
//! - [`dedup`]: last-announced timestamp
//! - [`announce`]: `new_article` delivery to subscribers
//!
//! ## Quick Start
//!
//! ```bash
//! # Poll every 5 minutes until interrupted
//! brightfeed run
//!
//! # Check once and print the event
//! brightfeed check
//! ```

/// Event delivery.
///
/// - [`AnnouncementEmitter`](announce::AnnouncementEmitter): fans out to subscribers
/// - [`Subscriber`](announce::Subscriber): async trait for event sinks
/// - [`LogSubscriber`](announce::LogSubscriber), [`WebhookSubscriber`](announce::WebhookSubscriber)
pub mod announce;

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct owns every piece of cycle
/// state: fetcher, selector, image cache, dedup gate, emitter.
pub mod app;

/// Command-line interface using clap.
///
/// - `run` - poll until interrupted
/// - `check` - one cycle, printed as JSON
/// - `config` - show effective configuration
pub mod cli;

/// Configuration loaded from `~/.config/brightfeed/config.toml`.
pub mod config;

/// One poll cycle.
pub mod cycle;

/// Poll scheduler: startup check plus fixed-interval checks.
pub mod daemon;

/// Last-announced timestamp tracking.
pub mod dedup;

/// Core domain models.
///
/// - [`FeedItem`](domain::FeedItem): one feed entry
/// - [`AnnouncementPayload`](domain::AnnouncementPayload): `new_article` event data
pub mod domain;

/// HTTP fetching.
///
/// - [`Fetcher`](fetcher::Fetcher): async trait for downloads
/// - [`HttpFetcher`](fetcher::HttpFetcher): reqwest-based implementation
/// - [`FeedFetcher`](fetcher::FeedFetcher): download plus normalization
pub mod fetcher;

/// The reusable image handle and its cache.
pub mod image;

/// Feed parsing and normalization.
///
/// RSS 0.9x/1.0/2.0 via `rss`, Atom and JSON Feed via `feed-rs`.
pub mod normalizer;

/// Choice of the item to announce.
pub mod selector;
