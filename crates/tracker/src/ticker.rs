//! Countdown ticker.
//!
//! A background task that periodically re-derives `time_until_next_slot`
//! from the last published snapshot, and triggers the full recompute plus
//! an authoritative refresh when a slot frees up. Runs on its own schedule,
//! independent of network calls, and stops cleanly on shutdown so no timer
//! outlives the session.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::time::interval;
use tracing::{debug, info};

use crate::tracker::{SubmissionTracker, TickOutcome};

/// Periodic countdown driver for a [`SubmissionTracker`].
pub struct CountdownTicker {
    tracker: Arc<SubmissionTracker>,
    interval: Duration,
    shutdown_rx: mpsc::Receiver<()>,
}

impl CountdownTicker {
    /// Create a ticker for the given tracker, using the tracker's
    /// configured interval.
    ///
    /// Returns the ticker and a shutdown sender; sending on the channel
    /// (or dropping it) stops the run loop.
    pub fn new(tracker: Arc<SubmissionTracker>) -> (Self, mpsc::Sender<()>) {
        let tick = tracker.config().tick_interval();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        (
            Self {
                tracker,
                interval: tick,
                shutdown_rx,
            },
            shutdown_tx,
        )
    }

    /// Override the tick interval.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Spawn the ticker as a background tokio task.
    ///
    /// Returns a `JoinHandle` that resolves once shutdown is signaled.
    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move { self.run().await })
    }

    /// Run the ticker until shutdown is signaled.
    pub async fn run(mut self) {
        info!("countdown ticker starting");

        let mut tick = interval(self.interval);

        loop {
            tokio::select! {
                _ = self.shutdown_rx.recv() => {
                    info!("countdown ticker received shutdown signal");
                    break;
                }
                _ = tick.tick() => {
                    self.handle_tick().await;
                }
            }
        }

        info!("countdown ticker stopped");
    }

    async fn handle_tick(&self) {
        match self.tracker.tick(Utc::now()) {
            TickOutcome::Idle => {}
            TickOutcome::Counting(state) => {
                debug!(
                    seconds = state.time_until_next_slot_seconds,
                    "countdown updated"
                );
            }
            TickOutcome::SlotFreed(state) => {
                info!(remaining = state.remaining, "slot freed, refreshing");
                if let Some(identity) = self.tracker.identity() {
                    self.tracker.force_refresh(&identity).await;
                }
            }
        }
    }
}
