//! The reconciliation state store.
//!
//! One tracker owns one creator session. Asset pushes and refresh calls
//! mutate an inner record set guarded by a lock; every transition publishes
//! a whole [`SubmissionState`] snapshot through a watch channel. Remote
//! figures win while fresh; the local evaluator is the floor under every
//! failure mode.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use slotwatch_client::{AuthorityVerdict, QuotaAuthority};
use slotwatch_core::{CreatorId, SubmissionRecord, WarningLevel, active_submissions, evaluate_local};

use crate::config::TrackerConfig;
use crate::state::{DataSource, SubmissionState};

/// A successful authority verdict plus the instant it was fetched.
struct CachedVerdict {
    verdict: AuthorityVerdict,
    fetched_at: DateTime<Utc>,
}

/// Mutable tracker internals, guarded by the outer lock.
struct Inner {
    records: Vec<SubmissionRecord>,
    identity: Option<CreatorId>,
    verdict: Option<CachedVerdict>,
    last_error: Option<String>,
    is_dev_mode: bool,
    is_loading: bool,
}

/// Outcome of one countdown tick.
#[derive(Debug)]
pub enum TickOutcome {
    /// No active submissions; nothing to count down.
    Idle,
    /// The countdown was re-derived by subtraction; no slot movement.
    Counting(SubmissionState),
    /// The oldest submission left the window and the active set was
    /// recomputed; the caller should follow up with a refresh.
    SlotFreed(SubmissionState),
}

/// Session-scoped submission window tracker.
///
/// Construct via [`TrackerBuilder`](crate::TrackerBuilder). The three
/// mutators (`set_assets`, `refresh`, `force_refresh`) are the only ways
/// state changes; reads never block on the network.
pub struct SubmissionTracker {
    config: TrackerConfig,
    authority: Option<Arc<dyn QuotaAuthority>>,
    inner: RwLock<Inner>,
    in_flight: AtomicBool,
    tx: watch::Sender<SubmissionState>,
}

impl SubmissionTracker {
    pub(crate) fn new_seeded(
        config: TrackerConfig,
        authority: Option<Arc<dyn QuotaAuthority>>,
        records: Vec<SubmissionRecord>,
    ) -> Self {
        let inner = Inner {
            records,
            identity: None,
            verdict: None,
            last_error: None,
            is_dev_mode: false,
            is_loading: false,
        };
        let seed = compose(&config, &inner, Utc::now());
        let (tx, _rx) = watch::channel(seed);
        Self {
            config,
            authority,
            inner: RwLock::new(inner),
            in_flight: AtomicBool::new(false),
            tx,
        }
    }

    /// The configuration this tracker runs with.
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// The identity of the last refresh, if any.
    pub fn identity(&self) -> Option<CreatorId> {
        self.inner.read().identity.clone()
    }

    /// Latest published snapshot; never blocks, never has side effects.
    pub fn state(&self) -> SubmissionState {
        self.tx.borrow().clone()
    }

    /// Subscribe to every published snapshot.
    ///
    /// Dropping the receiver unsubscribes; the tracker publishes regardless
    /// of how many receivers exist.
    pub fn subscribe(&self) -> watch::Receiver<SubmissionState> {
        self.tx.subscribe()
    }

    /// Replace the record set from the asset source and republish.
    ///
    /// Local figures are recomputed synchronously so the UI is never blank
    /// while a network call is pending. If a fresh authoritative verdict is
    /// cached, its counts stay in effect; only the record list, ordering,
    /// and expiry scheduling pick up the new assets.
    pub fn set_assets(&self, records: Vec<SubmissionRecord>) -> SubmissionState {
        let now = Utc::now();
        let mut inner = self.inner.write();
        inner.records = records;
        debug!(count = inner.records.len(), "asset list updated");
        self.publish(&inner, now)
    }

    /// Reconcile against the remote authority.
    ///
    /// With no identity the tracker stays on local figures permanently.
    /// With an identity, the last published numbers remain visible while
    /// the call is in flight; concurrent refreshes collapse into the
    /// pending call. A verdict fetched within the freshness window is
    /// reused without touching the network.
    pub async fn refresh(&self, identity: Option<&CreatorId>) -> SubmissionState {
        self.refresh_inner(identity, false).await
    }

    /// Re-run reconciliation immediately, bypassing the freshness window.
    ///
    /// Backs the manual "Retry" affordance and the tick-triggered recompute.
    pub async fn force_refresh(&self, identity: &CreatorId) -> SubmissionState {
        self.refresh_inner(Some(identity), true).await
    }

    async fn refresh_inner(
        &self,
        identity: Option<&CreatorId>,
        force: bool,
    ) -> SubmissionState {
        let now = Utc::now();

        let Some(identity) = identity else {
            let mut inner = self.inner.write();
            inner.identity = None;
            inner.verdict = None;
            info!("no identity, staying on local figures");
            return self.publish(&inner, now);
        };

        let Some(authority) = self.authority.clone() else {
            warn!(identity = %identity, "no authority configured, staying on local figures");
            let mut inner = self.inner.write();
            inner.identity = Some(identity.clone());
            return self.publish(&inner, now);
        };

        if !force {
            let inner = self.inner.read();
            if inner.identity.as_ref() == Some(identity)
                && let Some(cached) = &inner.verdict
                && now - cached.fetched_at < self.config.authority_ttl()
            {
                debug!(identity = %identity, "authority verdict still fresh, skipping call");
                return self.publish(&inner, now);
            }
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!(identity = %identity, "refresh already in flight, collapsing");
            return self.state();
        }

        {
            let mut inner = self.inner.write();
            inner.identity = Some(identity.clone());
            inner.is_loading = true;
            self.publish(&inner, now);
        }

        let result = authority.check_usage(identity).await;

        let state = {
            let now = Utc::now();
            let mut inner = self.inner.write();
            inner.is_loading = false;
            match result {
                Ok(verdict) => {
                    info!(
                        identity = %identity,
                        count = verdict.count,
                        limit = verdict.limit,
                        whitelisted = verdict.is_whitelisted,
                        "authoritative usage received"
                    );
                    inner.verdict = Some(CachedVerdict {
                        verdict,
                        fetched_at: now,
                    });
                    inner.last_error = None;
                    inner.is_dev_mode = false;
                }
                Err(e) => {
                    if e.is_dev_mode_skip() {
                        debug!(identity = %identity, "authority skipped in dev mode, using local figures");
                        inner.is_dev_mode = true;
                    } else {
                        warn!(identity = %identity, error = %e, "authority check failed, falling back to local figures");
                    }
                    inner.verdict = None;
                    inner.last_error = Some(e.to_string());
                }
            }
            self.publish(&inner, now)
        };

        self.in_flight.store(false, Ordering::SeqCst);
        state
    }

    /// Advance the countdown to `now`.
    ///
    /// The cheap path re-derives `time_until_next_slot` by subtracting from
    /// the last published `next_expiry_at` without re-running either
    /// evaluator. Once the countdown hits zero the full recompute runs so
    /// the freed slot shows up in `remaining`/`is_at_limit`; the countdown
    /// never goes negative.
    pub fn tick(&self, now: DateTime<Utc>) -> TickOutcome {
        let inner = self.inner.read();
        let current = self.tx.borrow().clone();
        let Some(next_expiry) = current.next_expiry_at else {
            return TickOutcome::Idle;
        };

        let remaining = next_expiry - now;
        if remaining > chrono::Duration::zero() {
            let mut updated = current;
            updated.time_until_next_slot_seconds = Some(remaining.num_seconds());
            self.tx.send_replace(updated.clone());
            return TickOutcome::Counting(updated);
        }

        let state = self.publish(&inner, now);
        // Window membership uses the day-truncated boundary, so the
        // instant-precise countdown can reach zero while the record is
        // still inside the window; only report a freed slot once the
        // active set actually moves.
        if state.next_expiry_at == Some(next_expiry) {
            TickOutcome::Counting(state)
        } else {
            TickOutcome::SlotFreed(state)
        }
    }

    /// Compose and publish one snapshot while holding the inner lock.
    fn publish(&self, inner: &Inner, now: DateTime<Utc>) -> SubmissionState {
        let state = compose(&self.config, inner, now);
        self.tx.send_replace(state.clone());
        state
    }
}

/// Build a snapshot from the inner state.
///
/// The record set, ordering, and expiry scheduling always come from the
/// local evaluators; a fresh authoritative verdict only overrides the
/// counts and the whitelist flag.
fn compose(config: &TrackerConfig, inner: &Inner, now: DateTime<Utc>) -> SubmissionState {
    let quota = &config.quota;
    let active = active_submissions(&inner.records, now, quota.window_days);
    let local = evaluate_local(&active, quota.max_submissions, now);

    let fresh = inner
        .verdict
        .as_ref()
        .filter(|c| now - c.fetched_at < config.authority_ttl());

    let (limit, remaining, is_at_limit, is_whitelisted, data_source) = match fresh {
        Some(cached) => {
            let v = &cached.verdict;
            let remaining = v.remaining();
            (
                v.limit,
                remaining,
                v.count > 0 && remaining == 0,
                v.is_whitelisted,
                DataSource::External,
            )
        }
        None => (
            quota.max_submissions,
            local.remaining,
            local.is_at_limit,
            false,
            DataSource::Local,
        ),
    };

    SubmissionState {
        submissions: active,
        limit,
        remaining,
        is_at_limit,
        next_expiry_at: local.next_expiry_at,
        is_whitelisted,
        data_source,
        is_loading: inner.is_loading,
        is_dev_mode: inner.is_dev_mode,
        has_error: inner.last_error.is_some(),
        error_message: inner.last_error.clone(),
        warning_level: WarningLevel::derive(
            remaining,
            is_at_limit,
            is_whitelisted,
            quota.caution_threshold,
        ),
        time_until_next_slot_seconds: local.time_until_next_slot.map(|d| d.num_seconds()),
    }
}
