#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! SABnzbd API client and rate limiter adapter.
//!
//! The tool exposes a single parameterized endpoint; the speed limit is
//! changed with `mode=config&name=speedlimit&value=<kib_s>` keyed by the
//! instance API key. Only the download direction applies.

pub mod error;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use seedwarden_config::SabnzbdSettings;
use seedwarden_policy::{RateLimiter, ThrottleTier};

pub use error::{SabnzbdError, SabnzbdResult};

/// Client for one SABnzbd instance.
#[derive(Debug, Clone)]
pub struct SabnzbdClient {
    client: Client,
    api_url: Url,
    api_key: String,
}

impl SabnzbdClient {
    /// Build a client from settings with the supplied request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when no API key is configured, the endpoint URL
    /// cannot be assembled, or the HTTP client fails to build.
    pub fn new(settings: &SabnzbdSettings, timeout: Duration) -> SabnzbdResult<Self> {
        let api_key = settings
            .api_key
            .clone()
            .ok_or(SabnzbdError::MissingApiKey)?;
        let endpoint = format!("http://{}:{}/sabnzbd/api", settings.host, settings.port);
        let api_url = endpoint
            .parse()
            .map_err(|source| SabnzbdError::InvalidEndpoint { endpoint, source })?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| SabnzbdError::ClientBuild { source })?;

        Ok(Self {
            client,
            api_url,
            api_key,
        })
    }

    /// Set the global download speed limit in KiB/s. Zero lifts the limit.
    ///
    /// # Errors
    ///
    /// Returns an error when the call fails or the API reports failure.
    pub async fn set_speed_limit(&self, kib_s: u64) -> SabnzbdResult<()> {
        let response = self
            .client
            .get(self.api_url.clone())
            .query(&[
                ("mode", "config"),
                ("name", "speedlimit"),
                ("apikey", self.api_key.as_str()),
                ("value", &kib_s.to_string()),
                ("output", "json"),
            ])
            .send()
            .await
            .map_err(|source| SabnzbdError::Http { source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SabnzbdError::Status {
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| SabnzbdError::Http { source })?;
        let ack: ApiAck = serde_json::from_slice(&bytes)
            .map_err(|source| SabnzbdError::Malformed { source })?;
        if !ack.status {
            return Err(SabnzbdError::Rejected);
        }
        debug!(kib_s, "speed limit updated");
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct ApiAck {
    status: bool,
}

/// Applies throttle tiers to SABnzbd.
///
/// Only the download rate is sent; the unlimited tier maps to zero, which
/// the tool reads as no limit. A disabled adapter is a logged no-op.
#[derive(Debug, Clone)]
pub struct SabnzbdLimiter {
    client: Option<SabnzbdClient>,
}

impl SabnzbdLimiter {
    /// Build the adapter; a disabled tool yields a permanent no-op.
    ///
    /// # Errors
    ///
    /// Returns an error when the adapter is enabled but the client cannot be
    /// constructed.
    pub fn new(settings: &SabnzbdSettings, timeout: Duration) -> SabnzbdResult<Self> {
        let client = settings
            .enabled
            .then(|| SabnzbdClient::new(settings, timeout))
            .transpose()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl RateLimiter for SabnzbdLimiter {
    fn name(&self) -> &'static str {
        "sabnzbd"
    }

    async fn apply(&self, tier: ThrottleTier) -> anyhow::Result<()> {
        let Some(client) = &self.client else {
            debug!(tier = %tier, "sabnzbd limiter disabled; skipping");
            return Ok(());
        };
        let kib_s = tier.rates().map_or(0, |(down, _)| down);
        client.set_speed_limit(kib_s).await?;
        Ok(())
    }
}
