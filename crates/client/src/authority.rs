//! The authority seam the tracker consumes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use slotwatch_core::CreatorId;

use crate::error::AuthorityError;

/// Authoritative usage verdict for one creator identity.
///
/// The remote supplies counts, not per-record expiry; expiry scheduling is
/// always derived from local record timestamps even when these figures win.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorityVerdict {
    /// Submissions counted against the window by the remote.
    pub count: u32,
    /// The limit the remote enforces.
    pub limit: u32,
    /// Whether the identity is exempt from the limit.
    pub is_whitelisted: bool,
    /// When the remote produced this answer.
    pub as_of: DateTime<Utc>,
}

impl AuthorityVerdict {
    /// Slots still open according to the remote, clamped at zero.
    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.limit.saturating_sub(self.count)
    }
}

/// Object-safe seam for authoritative usage checks.
///
/// One outbound call per invocation, no retries inside (retry is a caller
/// policy), no mutating effect on server state. Implemented by
/// [`AuthorityClient`](crate::AuthorityClient) and by test doubles.
#[async_trait]
pub trait QuotaAuthority: Send + Sync {
    /// Fetch the authoritative usage verdict for `identity`.
    async fn check_usage(&self, identity: &CreatorId) -> Result<AuthorityVerdict, AuthorityError>;
}
