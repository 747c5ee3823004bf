//! Error taxonomy for the remote authority client.

use thiserror::Error;

/// Failure modes surfaced by a remote authority check.
///
/// Every failure is a value; the client never panics and never lets an
/// error escape untagged. The tracker downgrades to local figures on any
/// of these.
#[derive(Debug, Error)]
pub enum AuthorityError {
    /// The call exceeded the configured timeout.
    #[error("authority request timed out")]
    Timeout,

    /// Transport-level failure (DNS, connect, TLS, reset).
    #[error("network error: {0}")]
    Network(String),

    /// The endpoint answered with a non-success HTTP status.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
    },

    /// The response body did not match the expected schema.
    #[error("invalid authority response: {0}")]
    InvalidResponse(String),

    /// The execution context is known to be blocked from the remote; the
    /// call was skipped without waiting out the timeout.
    #[error("authority check skipped in dev mode")]
    DevModeSkipped,

    /// Client construction error.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl AuthorityError {
    /// Returns `true` if retrying the call could plausibly succeed.
    ///
    /// Timeouts, transport failures, and HTTP 5xx return `true`; schema
    /// mismatches, dev-mode skips, and configuration errors do not.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout | Self::Network(_) => true,
            Self::Http { status, .. } => *status >= 500,
            Self::InvalidResponse(_) | Self::DevModeSkipped | Self::Configuration(_) => false,
        }
    }

    /// Returns `true` if the call was short-circuited by dev mode.
    #[must_use]
    pub fn is_dev_mode_skip(&self) -> bool {
        matches!(self, Self::DevModeSkipped)
    }
}
