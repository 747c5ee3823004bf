//! Slotwatch reconciliation store.
//!
//! Tracks how many submissions a creator has in flight inside the rolling
//! admission window, reconciling the remote authority's answer with the
//! always-available local evaluator, and publishes immutable state
//! snapshots to the UI layer.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use slotwatch_client::AuthorityClient;
//! use slotwatch_core::CreatorId;
//! use slotwatch_tracker::{CountdownTicker, TrackerBuilder};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), slotwatch_tracker::TrackerError> {
//!     let tracker = Arc::new(
//!         TrackerBuilder::new()
//!             .authority(Arc::new(AuthorityClient::new("https://api.example.com")))
//!             .build()?,
//!     );
//!
//!     // Seed from the asset source, then reconcile with the remote.
//!     tracker.set_assets(Vec::new());
//!     tracker.refresh(Some(&CreatorId::new("creator-42"))).await;
//!
//!     // Drive the countdown until teardown.
//!     let (ticker, shutdown) = CountdownTicker::new(Arc::clone(&tracker));
//!     let handle = ticker.spawn();
//!
//!     let state = tracker.state();
//!     println!("{} of {} slots remaining", state.remaining, state.limit);
//!
//!     shutdown.send(()).await.ok();
//!     handle.await.ok();
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod state;
pub mod ticker;
pub mod tracker;

pub use builder::TrackerBuilder;
pub use config::TrackerConfig;
pub use error::TrackerError;
pub use state::{DataSource, SubmissionState};
pub use ticker::CountdownTicker;
pub use tracker::{SubmissionTracker, TickOutcome};
