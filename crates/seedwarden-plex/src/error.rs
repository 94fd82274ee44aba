//! Error types for the media-server session client.

use thiserror::Error;

/// Primary error type for session queries.
#[derive(Debug, Error)]
pub enum PlexError {
    /// Base URL derived from settings was invalid.
    #[error("invalid session endpoint")]
    InvalidEndpoint {
        /// Endpoint assembled from host and port.
        endpoint: String,
        /// Source parse error.
        #[source]
        source: url::ParseError,
    },
    /// Access token contained characters that cannot appear in a header.
    #[error("access token is not a valid header value")]
    InvalidToken,
    /// HTTP client could not be constructed.
    #[error("failed to build http client")]
    ClientBuild {
        /// Source HTTP client error.
        #[source]
        source: reqwest::Error,
    },
    /// Request to the session endpoint failed.
    #[error("session request failed")]
    Http {
        /// URL used for the request.
        url: String,
        /// Source HTTP client error.
        #[source]
        source: reqwest::Error,
    },
    /// Session endpoint returned a non-success status.
    #[error("session endpoint returned error status")]
    Status {
        /// URL used for the request.
        url: String,
        /// HTTP status code returned by the server.
        status: u16,
    },
    /// Session payload could not be decoded.
    #[error("malformed session payload")]
    Malformed {
        /// URL used for the request.
        url: String,
        /// Source deserialization error.
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience alias for session query results.
pub type PlexResult<T> = Result<T, PlexError>;
