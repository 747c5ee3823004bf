//! End-to-end tracker flow against a scripted authority.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::Mutex;

use slotwatch_client::{AuthorityError, AuthorityVerdict, QuotaAuthority};
use slotwatch_core::{CreatorId, QuotaConfig, SubmissionRecord, SubmissionStatus};
use slotwatch_tracker::{CountdownTicker, DataSource, TrackerBuilder, TrackerConfig};

struct ScriptedAuthority {
    responses: Mutex<VecDeque<Result<AuthorityVerdict, AuthorityError>>>,
    calls: AtomicUsize,
}

impl ScriptedAuthority {
    fn new(responses: Vec<Result<AuthorityVerdict, AuthorityError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into_iter().collect()),
            calls: AtomicUsize::new(0),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuotaAuthority for ScriptedAuthority {
    async fn check_usage(&self, _identity: &CreatorId) -> Result<AuthorityVerdict, AuthorityError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(AuthorityError::Network("script exhausted".into())))
    }
}

fn verdict(count: u32, limit: u32) -> AuthorityVerdict {
    AuthorityVerdict {
        count,
        limit,
        is_whitelisted: false,
        as_of: Utc::now(),
    }
}

fn records_back(days: &[i64]) -> Vec<SubmissionRecord> {
    let now = Utc::now();
    days.iter()
        .enumerate()
        .map(|(i, d)| {
            SubmissionRecord::new(
                format!("asset-{i}"),
                format!("Asset {i}"),
                now - Duration::days(*d),
                SubmissionStatus::Live,
            )
        })
        .collect()
}

#[tokio::test]
async fn reconcile_fail_and_retry_flow() {
    let authority = ScriptedAuthority::new(vec![
        Ok(verdict(5, 6)),
        Err(AuthorityError::Http {
            status: 503,
            message: "Service Unavailable".into(),
        }),
        Ok(verdict(4, 6)),
    ]);
    let identity = CreatorId::new("creator-1");

    let tracker = TrackerBuilder::new()
        .authority(authority.clone())
        .assets(records_back(&[1, 8, 15]))
        .build()
        .unwrap();

    // Seeded local figures are available before any network attempt.
    let state = tracker.state();
    assert_eq!(state.data_source, DataSource::Local);
    assert_eq!(state.remaining, 3);
    assert_eq!(state.submissions.len(), 3);

    // First reconcile: the remote's count wins.
    let state = tracker.refresh(Some(&identity)).await;
    assert_eq!(state.data_source, DataSource::External);
    assert_eq!(state.remaining, 1);
    assert!(!state.has_error);

    // Remote failure: fall back to local figures with the retry affordance.
    let state = tracker.force_refresh(&identity).await;
    assert_eq!(state.data_source, DataSource::Local);
    assert_eq!(state.remaining, 3);
    assert!(state.has_error);
    assert!(state.error_message.unwrap().contains("503"));

    // Manual retry succeeds and restores the external figures.
    let state = tracker.force_refresh(&identity).await;
    assert_eq!(state.data_source, DataSource::External);
    assert_eq!(state.remaining, 2);
    assert!(!state.has_error);

    assert_eq!(authority.call_count(), 3);
}

#[tokio::test]
async fn stale_external_result_reverts_to_local_on_asset_change() {
    let authority = ScriptedAuthority::new(vec![Ok(verdict(2, 6))]);
    let identity = CreatorId::new("creator-1");

    let tracker = TrackerBuilder::new()
        .config(TrackerConfig {
            authority_ttl_seconds: 1,
            ..TrackerConfig::default()
        })
        .authority(authority)
        .assets(records_back(&[4]))
        .build()
        .unwrap();

    let state = tracker.refresh(Some(&identity)).await;
    assert_eq!(state.data_source, DataSource::External);
    assert_eq!(state.remaining, 4);

    tokio::time::sleep(StdDuration::from_millis(1200)).await;

    // The verdict has aged out, so the recomputed local figures win again.
    let state = tracker.set_assets(records_back(&[4]));
    assert_eq!(state.data_source, DataSource::Local);
    assert_eq!(state.remaining, 5);
    assert!(!state.has_error);
}

#[tokio::test]
async fn ticker_republishes_countdown_until_shutdown() {
    let tracker = Arc::new(
        TrackerBuilder::new()
            .config(TrackerConfig {
                quota: QuotaConfig::default(),
                tick_interval_seconds: 60,
                ..TrackerConfig::default()
            })
            .assets(records_back(&[10]))
            .build()
            .unwrap(),
    );
    let mut rx = tracker.subscribe();

    let (ticker, shutdown_tx) = CountdownTicker::new(Arc::clone(&tracker));
    let handle = ticker.with_interval(StdDuration::from_millis(25)).spawn();

    // At least one tick lands and republishes the countdown.
    tokio::time::timeout(StdDuration::from_secs(1), rx.changed())
        .await
        .expect("tick should republish within a second")
        .unwrap();

    let state = rx.borrow_and_update().clone();
    let seconds = state.time_until_next_slot_seconds.unwrap();
    // Submitted 10 days ago with a 30-day window: about 20 days remain.
    assert!(seconds <= 20 * 86_400);
    assert!(seconds > 19 * 86_400);

    shutdown_tx.send(()).await.unwrap();
    tokio::time::timeout(StdDuration::from_secs(1), handle)
        .await
        .expect("ticker should stop after shutdown")
        .unwrap();
}
