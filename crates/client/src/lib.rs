//! Slotwatch remote authority client.
//!
//! A thin HTTP client for the marketplace's submission-usage endpoint. The
//! endpoint is the authoritative source for a creator's in-window count,
//! limit, and whitelist status; the tracker falls back to local figures
//! whenever a call here fails.
//!
//! # Quick Start
//!
//! ```no_run
//! use slotwatch_client::{AuthorityClient, QuotaAuthority};
//! use slotwatch_core::CreatorId;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), slotwatch_client::AuthorityError> {
//!     let client = AuthorityClient::new("https://api.example.com");
//!     let verdict = client.check_usage(&CreatorId::new("creator-42")).await?;
//!     println!("{} of {} slots used", verdict.count, verdict.limit);
//!     Ok(())
//! }
//! ```
//!
//! # Configuration
//!
//! Use the builder for a custom timeout, API key, or dev-mode short circuit:
//!
//! ```no_run
//! use slotwatch_client::AuthorityClientBuilder;
//! use std::time::Duration;
//!
//! let client = AuthorityClientBuilder::new("https://api.example.com")
//!     .timeout(Duration::from_secs(8))
//!     .api_key("secret")
//!     .build()
//!     .unwrap();
//! ```

mod authority;
mod error;

pub use authority::{AuthorityVerdict, QuotaAuthority};
pub use error::AuthorityError;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use slotwatch_core::CreatorId;

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP client for the remote submission-usage authority.
///
/// One outbound call per [`check_usage`](QuotaAuthority::check_usage), no
/// retries, no server-side mutation; safe to call repeatedly.
#[derive(Debug, Clone)]
pub struct AuthorityClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    dev_mode: bool,
}

/// Builder for configuring an [`AuthorityClient`].
#[derive(Debug)]
pub struct AuthorityClientBuilder {
    base_url: String,
    timeout: Duration,
    api_key: Option<String>,
    dev_mode: bool,
    client: Option<Client>,
}

impl AuthorityClientBuilder {
    /// Create a new builder with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
            api_key: None,
            dev_mode: false,
            client: None,
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the API key for authentication.
    #[must_use]
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Mark the execution context as unable to reach the remote (e.g. a
    /// cross-origin development environment). Calls short-circuit with
    /// [`AuthorityError::DevModeSkipped`] instead of waiting out the timeout.
    #[must_use]
    pub fn dev_mode(mut self, dev_mode: bool) -> Self {
        self.dev_mode = dev_mode;
        self
    }

    /// Use a custom reqwest Client.
    ///
    /// Useful for configuring TLS, proxies, or other advanced settings.
    #[must_use]
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<AuthorityClient, AuthorityError> {
        let client = match self.client {
            Some(c) => c,
            None => Client::builder()
                .timeout(self.timeout)
                .build()
                .map_err(|e| AuthorityError::Configuration(e.to_string()))?,
        };

        Ok(AuthorityClient {
            client,
            base_url: self.base_url,
            api_key: self.api_key,
            dev_mode: self.dev_mode,
        })
    }
}

impl AuthorityClient {
    /// Create a new client with default configuration.
    pub fn new(base_url: impl Into<String>) -> Self {
        AuthorityClientBuilder::new(base_url)
            .build()
            .expect("default client configuration should not fail")
    }

    /// Create a builder for advanced configuration.
    pub fn builder(base_url: impl Into<String>) -> AuthorityClientBuilder {
        AuthorityClientBuilder::new(base_url)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Add authorization header if API key is set.
    fn add_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => req.header("Authorization", format!("Bearer {key}")),
            None => req,
        }
    }
}

#[async_trait]
impl QuotaAuthority for AuthorityClient {
    async fn check_usage(&self, identity: &CreatorId) -> Result<AuthorityVerdict, AuthorityError> {
        if self.dev_mode {
            debug!(identity = %identity, "dev mode, skipping authority call");
            return Err(AuthorityError::DevModeSkipped);
        }

        let url = format!("{}/v1/creators/{identity}/usage", self.base_url);
        let response = self
            .add_auth(self.client.get(&url))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthorityError::Http {
                status: status.as_u16(),
                message: format!("usage check failed: {status}"),
            });
        }

        let body = response.json::<UsageResponse>().await.map_err(|e| {
            if e.is_timeout() {
                AuthorityError::Timeout
            } else {
                AuthorityError::InvalidResponse(e.to_string())
            }
        })?;

        let verdict = body.into_verdict(Utc::now());
        debug!(
            identity = %identity,
            count = verdict.count,
            limit = verdict.limit,
            whitelisted = verdict.is_whitelisted,
            "authority verdict received"
        );
        Ok(verdict)
    }
}

fn map_transport_error(e: reqwest::Error) -> AuthorityError {
    if e.is_timeout() {
        AuthorityError::Timeout
    } else {
        AuthorityError::Network(e.to_string())
    }
}

/// Wire shape of the usage endpoint's response body.
#[derive(Debug, Deserialize)]
struct UsageResponse {
    count: u32,
    limit: u32,
    #[serde(default)]
    whitelisted: bool,
    #[serde(default)]
    as_of: Option<DateTime<Utc>>,
}

impl UsageResponse {
    /// Fold the wire shape into a verdict, stamping `received_at` when the
    /// remote did not supply its own `as_of`.
    fn into_verdict(self, received_at: DateTime<Utc>) -> AuthorityVerdict {
        AuthorityVerdict {
            count: self.count,
            limit: self.limit,
            is_whitelisted: self.whitelisted,
            as_of: self.as_of.unwrap_or(received_at),
        }
    }
}
