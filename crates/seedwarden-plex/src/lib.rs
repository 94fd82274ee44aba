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

//! Media-server session client and remote stream census.
//!
//! Queries the `/status/sessions` endpoint with the `X-Plex-Token` header
//! and counts how many active players sit outside the private LAN ranges.
//! Every census is a fresh query; nothing is cached between runs.

pub mod error;

use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

use seedwarden_config::PlexSettings;
use seedwarden_policy::classify;

pub use error::{PlexError, PlexResult};

const TOKEN_HEADER: &str = "X-Plex-Token";

/// Result of one session census.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionCensus {
    /// Total active sessions reported by the server.
    pub total: usize,
    /// Sessions whose player address classifies as remote.
    pub remote: usize,
}

/// Client for the media-server session endpoint.
#[derive(Debug, Clone)]
pub struct PlexClient {
    client: Client,
    sessions_url: Url,
}

impl PlexClient {
    /// Build a client from settings with the supplied request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the endpoint URL cannot be assembled, the token
    /// contains characters invalid in a header, or the HTTP client fails to
    /// build.
    pub fn new(settings: &PlexSettings, timeout: Duration) -> PlexResult<Self> {
        let endpoint = format!("http://{}:{}/status/sessions", settings.host, settings.port);
        let sessions_url = endpoint
            .parse()
            .map_err(|source| PlexError::InvalidEndpoint { endpoint, source })?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let token =
            HeaderValue::from_str(&settings.token).map_err(|_| PlexError::InvalidToken)?;
        headers.insert(TOKEN_HEADER, token);

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|source| PlexError::ClientBuild { source })?;

        Ok(Self {
            client,
            sessions_url,
        })
    }

    /// Query the current sessions and count the remote ones.
    ///
    /// Players without an address (or with an unparseable one) count as
    /// remote; the classifier fails open.
    ///
    /// # Errors
    ///
    /// Returns an error when the query fails, the server responds with a
    /// non-success status, or the payload cannot be decoded.
    pub async fn census(&self) -> PlexResult<SessionCensus> {
        let url = self.sessions_url.clone();
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| PlexError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlexError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(|source| PlexError::Http {
            url: url.to_string(),
            source,
        })?;
        let envelope: SessionsEnvelope =
            serde_json::from_slice(&bytes).map_err(|source| PlexError::Malformed {
                url: url.to_string(),
                source,
            })?;

        let census = envelope.media_container.census();
        debug!(
            total = census.total,
            remote = census.remote,
            "session census complete"
        );
        Ok(census)
    }
}

#[derive(Debug, Deserialize)]
struct SessionsEnvelope {
    #[serde(rename = "MediaContainer", default)]
    media_container: MediaContainer,
}

#[derive(Debug, Default, Deserialize)]
struct MediaContainer {
    #[serde(default)]
    size: usize,
    #[serde(rename = "Metadata", default)]
    metadata: Vec<SessionEntry>,
}

impl MediaContainer {
    fn census(&self) -> SessionCensus {
        let remote = self
            .metadata
            .iter()
            .filter(|entry| {
                entry
                    .player
                    .as_ref()
                    .is_none_or(|player| classify(&player.address).is_remote())
            })
            .count();
        SessionCensus {
            total: self.size,
            remote,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SessionEntry {
    #[serde(rename = "Player")]
    player: Option<PlayerEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct PlayerEntry {
    #[serde(default)]
    address: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(server: &MockServer) -> PlexClient {
        let settings = PlexSettings {
            host: server.host(),
            port: server.port(),
            token: "t0ken".to_string(),
        };
        PlexClient::new(&settings, Duration::from_secs(2)).expect("client builds")
    }

    #[tokio::test]
    async fn census_counts_only_remote_players() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/status/sessions")
                .header("X-Plex-Token", "t0ken")
                .header("Accept", "application/json");
            then.status(200).json_body(json!({
                "MediaContainer": {
                    "size": 4,
                    "Metadata": [
                        { "Player": { "address": "192.168.1.20" } },
                        { "Player": { "address": "203.0.113.9" } },
                        { "Player": { "address": "10.0.0.5:32400" } },
                        { "Player": { "address": "garbage" } }
                    ]
                }
            }));
        });

        let census = client_for(&server).census().await.expect("census succeeds");
        assert_eq!(census, SessionCensus { total: 4, remote: 2 });
        mock.assert();
    }

    #[tokio::test]
    async fn players_without_an_address_count_as_remote() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/status/sessions");
            then.status(200).json_body(json!({
                "MediaContainer": { "size": 1, "Metadata": [ {} ] }
            }));
        });

        let census = client_for(&server).census().await.expect("census succeeds");
        assert_eq!(census.remote, 1);
    }

    #[tokio::test]
    async fn empty_container_yields_zero_counts() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/status/sessions");
            then.status(200).json_body(json!({ "MediaContainer": { "size": 0 } }));
        });

        let census = client_for(&server).census().await.expect("census succeeds");
        assert_eq!(census, SessionCensus { total: 0, remote: 0 });
    }

    #[tokio::test]
    async fn error_status_is_surfaced() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/status/sessions");
            then.status(401);
        });

        let err = client_for(&server)
            .census()
            .await
            .expect_err("unauthorized should fail");
        assert!(matches!(err, PlexError::Status { status: 401, .. }));
    }

    #[tokio::test]
    async fn malformed_payload_is_surfaced() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/status/sessions");
            then.status(200).body("<MediaContainer/>");
        });

        let err = client_for(&server)
            .census()
            .await
            .expect_err("xml body should fail json decode");
        assert!(matches!(err, PlexError::Malformed { .. }));
    }
}
