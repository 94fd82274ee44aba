//! Error types for the SABnzbd API client.

use thiserror::Error;

/// Primary error type for SABnzbd operations.
#[derive(Debug, Error)]
pub enum SabnzbdError {
    /// API URL derived from settings was invalid.
    #[error("invalid api endpoint")]
    InvalidEndpoint {
        /// Endpoint assembled from host and port.
        endpoint: String,
        /// Source parse error.
        #[source]
        source: url::ParseError,
    },
    /// Adapter is enabled but no API key was configured.
    #[error("api key is required when the adapter is enabled")]
    MissingApiKey,
    /// HTTP client could not be constructed.
    #[error("failed to build http client")]
    ClientBuild {
        /// Source HTTP client error.
        #[source]
        source: reqwest::Error,
    },
    /// Request to the API endpoint failed.
    #[error("api request failed")]
    Http {
        /// Source HTTP client error.
        #[source]
        source: reqwest::Error,
    },
    /// API endpoint returned a non-success status.
    #[error("api endpoint returned error status")]
    Status {
        /// HTTP status code returned by the server.
        status: u16,
    },
    /// API payload could not be decoded.
    #[error("malformed api payload")]
    Malformed {
        /// Source deserialization error.
        #[source]
        source: serde_json::Error,
    },
    /// API acknowledged the call but reported failure.
    #[error("api rejected the speed limit change")]
    Rejected,
}

/// Convenience alias for SABnzbd results.
pub type SabnzbdResult<T> = Result<T, SabnzbdError>;
