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

//! Transmission RPC client and adapters.
//!
//! Speaks the daemon's JSON-over-HTTP RPC dialect: one POST endpoint, a
//! `{"method", "arguments"}` envelope, and a CSRF session id delivered via a
//! 409 handshake. The client implements the policy capability traits so the
//! cleanup rules and throttle pipeline never see Transmission specifics.
//!
//! Layout: `rpc.rs` (wire DTOs and snapshot mapping), `limiter.rs`
//! (alternate-speed rate limiter adapter), `error.rs` (error types).

pub mod error;
pub mod limiter;
pub mod rpc;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use tokio::sync::Mutex;
use tracing::debug;
use url::Url;

use seedwarden_config::TransmissionSettings;
use seedwarden_policy::{SeedRatioMode, Torrent, TorrentControl, TorrentId};

pub use error::{TransmissionError, TransmissionResult};
pub use limiter::TransmissionLimiter;

const SESSION_ID_HEADER: &str = "X-Transmission-Session-Id";

/// Client for one Transmission daemon.
#[derive(Debug)]
pub struct TransmissionClient {
    client: Client,
    rpc_url: Url,
    auth: Option<(String, String)>,
    session_id: Mutex<Option<String>>,
}

impl TransmissionClient {
    /// Build a client from settings with the supplied request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the RPC URL cannot be assembled or the HTTP
    /// client fails to build.
    pub fn new(settings: &TransmissionSettings, timeout: Duration) -> TransmissionResult<Self> {
        let endpoint = format!("http://{}:{}/transmission/rpc", settings.host, settings.port);
        let rpc_url = endpoint
            .parse()
            .map_err(|source| TransmissionError::InvalidEndpoint { endpoint, source })?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| TransmissionError::ClientBuild { source })?;

        let auth = settings
            .username
            .clone()
            .map(|user| (user, settings.password.clone().unwrap_or_default()));

        Ok(Self {
            client,
            rpc_url,
            auth,
            session_id: Mutex::new(None),
        })
    }

    /// Toggle the daemon's alternate-speed mode.
    ///
    /// `Some((down, up))` enables the mode with the supplied KiB/s rates;
    /// `None` disables it, restoring normal limits.
    ///
    /// # Errors
    ///
    /// Returns an error when the RPC call fails.
    pub async fn set_alt_speed(&self, rates: Option<(u64, u64)>) -> TransmissionResult<()> {
        let arguments = match rates {
            Some((down, up)) => json!({
                "alt-speed-enabled": true,
                "alt-speed-down": down,
                "alt-speed-up": up,
            }),
            None => json!({ "alt-speed-enabled": false }),
        };
        self.call("session-set", arguments).await?;
        Ok(())
    }

    /// Issue one RPC call, transparently refreshing the session id on the
    /// daemon's 409 handshake (retried at most once).
    async fn call(&self, method: &'static str, arguments: Value) -> TransmissionResult<Value> {
        let body = json!({ "method": method, "arguments": arguments });
        let mut refreshed = false;
        loop {
            let mut request = self.client.post(self.rpc_url.clone()).json(&body);
            if let Some((user, password)) = &self.auth {
                request = request.basic_auth(user, Some(password));
            }
            if let Some(id) = self.session_id.lock().await.clone() {
                request = request.header(SESSION_ID_HEADER, id);
            }

            let response = request
                .send()
                .await
                .map_err(|source| TransmissionError::Http { method, source })?;
            let status = response.status();

            if status == StatusCode::CONFLICT && !refreshed {
                let id = response
                    .headers()
                    .get(SESSION_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .map(str::to_string)
                    .ok_or(TransmissionError::Handshake { method })?;
                debug!(method, "refreshed rpc session id");
                *self.session_id.lock().await = Some(id);
                refreshed = true;
                continue;
            }
            if !status.is_success() {
                return Err(TransmissionError::Status {
                    method,
                    status: status.as_u16(),
                });
            }

            let bytes = response
                .bytes()
                .await
                .map_err(|source| TransmissionError::Http { method, source })?;
            let envelope: rpc::RpcEnvelope = serde_json::from_slice(&bytes)
                .map_err(|source| TransmissionError::Malformed { method, source })?;
            if envelope.result != "success" {
                return Err(TransmissionError::Rpc {
                    method,
                    result: envelope.result,
                });
            }
            return Ok(envelope.arguments);
        }
    }

    async fn fetch_torrents(&self) -> TransmissionResult<Vec<Torrent>> {
        let arguments = json!({
            "fields": [
                "id",
                "name",
                "isPrivate",
                "trackers",
                "seedRatioMode",
                "status",
                "doneDate",
            ]
        });
        let payload = self.call("torrent-get", arguments).await?;
        let listing: rpc::TorrentListing = serde_json::from_value(payload).map_err(|source| {
            TransmissionError::Malformed {
                method: "torrent-get",
                source,
            }
        })?;
        listing
            .torrents
            .into_iter()
            .map(rpc::TorrentEntry::into_snapshot)
            .collect()
    }
}

#[async_trait]
impl TorrentControl for TransmissionClient {
    async fn list_torrents(&self) -> anyhow::Result<Vec<Torrent>> {
        Ok(self.fetch_torrents().await?)
    }

    async fn set_seed_ratio(
        &self,
        ids: &[TorrentId],
        limit: f64,
        mode: SeedRatioMode,
    ) -> anyhow::Result<()> {
        let arguments = json!({
            "ids": ids,
            "seedRatioLimit": limit,
            "seedRatioMode": rpc::ratio_mode_code(mode),
        });
        self.call("torrent-set", arguments).await?;
        Ok(())
    }

    async fn stop_torrents(&self, ids: &[TorrentId]) -> anyhow::Result<()> {
        self.call("torrent-stop", json!({ "ids": ids })).await?;
        Ok(())
    }

    async fn remove_torrents(&self, ids: &[TorrentId], delete_data: bool) -> anyhow::Result<()> {
        let arguments = json!({ "ids": ids, "delete-local-data": delete_data });
        self.call("torrent-remove", arguments).await?;
        Ok(())
    }
}
