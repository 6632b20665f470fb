//! Poll scheduler.
//!
//! Runs one check at startup, then one per interval for the lifetime of the
//! process. Every check is spawned as its own task, so a check that outlives
//! the interval overlaps the next one unless the overlap policy is `skip`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};

use crate::app::AppContext;
use crate::config::{format_interval, Config, ConfigError, OverlapPolicy};
use crate::cycle;

/// Scheduler configuration
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Poll period (default: 5 minutes)
    pub interval: Duration,
    /// Whether to run a check immediately on start
    pub run_on_start: bool,
    pub overlap: OverlapPolicy,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(300),
            run_on_start: true,
            overlap: OverlapPolicy::Allow,
        }
    }
}

impl SchedulerConfig {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            interval: config.poll_interval()?,
            run_on_start: config.poll.run_on_start,
            overlap: config.poll.overlap,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
}

pub struct PollScheduler {
    ctx: Arc<AppContext>,
    config: SchedulerConfig,
    in_flight: Arc<AtomicUsize>,
    shutdown: Arc<Notify>,
}

impl PollScheduler {
    pub fn new(ctx: Arc<AppContext>, config: SchedulerConfig) -> Self {
        Self {
            ctx,
            config,
            in_flight: Arc::new(AtomicUsize::new(0)),
            shutdown: Arc::new(Notify::new()),
        }
    }

    pub fn state(&self) -> SchedulerState {
        if self.in_flight.load(Ordering::SeqCst) > 0 {
            SchedulerState::Running
        } else {
            SchedulerState::Idle
        }
    }

    /// Stop scheduling new checks. A check already running is left to finish
    /// on its own.
    pub fn stop(&self) {
        self.shutdown.notify_one();
    }

    /// Run until [`stop`](Self::stop) is called.
    pub async fn run(&self) {
        info!(
            url = %self.ctx.feed_url,
            interval = %format_interval(self.config.interval.as_secs()),
            "poll scheduler started"
        );

        if self.config.run_on_start {
            self.trigger();
        }

        let mut timer = interval(self.config.interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        timer.tick().await; // Skip the first immediate tick

        loop {
            tokio::select! {
                _ = timer.tick() => {
                    self.trigger();
                }
                _ = self.shutdown.notified() => {
                    info!("poll scheduler shutting down");
                    break;
                }
            }
        }
    }

    /// Start one check on its own task.
    fn trigger(&self) -> Option<JoinHandle<()>> {
        if self.config.overlap == OverlapPolicy::Skip && self.state() == SchedulerState::Running {
            warn!("previous check still running, skipping tick");
            return None;
        }

        let ctx = self.ctx.clone();
        let guard = InFlight::enter(self.in_flight.clone());
        Some(tokio::spawn(async move {
            let _guard = guard;
            cycle::check(&ctx).await;
        }))
    }
}

/// Counts a running check until dropped, panics included.
struct InFlight(Arc<AtomicUsize>);

impl InFlight {
    fn enter(counter: Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Resolves on SIGINT/SIGTERM (Ctrl-C on Windows).
pub async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {},
                    _ = sigint.recv() => {},
                }
            }
            _ => {
                warn!("failed to install signal handlers, falling back to Ctrl-C");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
