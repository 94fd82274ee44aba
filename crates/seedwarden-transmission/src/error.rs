//! Error types for the Transmission RPC client.

use thiserror::Error;

/// Primary error type for Transmission operations.
#[derive(Debug, Error)]
pub enum TransmissionError {
    /// RPC URL derived from settings was invalid.
    #[error("invalid rpc endpoint")]
    InvalidEndpoint {
        /// Endpoint assembled from host and port.
        endpoint: String,
        /// Source parse error.
        #[source]
        source: url::ParseError,
    },
    /// HTTP client could not be constructed.
    #[error("failed to build http client")]
    ClientBuild {
        /// Source HTTP client error.
        #[source]
        source: reqwest::Error,
    },
    /// Request to the RPC endpoint failed.
    #[error("rpc request failed")]
    Http {
        /// RPC method being invoked.
        method: &'static str,
        /// Source HTTP client error.
        #[source]
        source: reqwest::Error,
    },
    /// RPC endpoint returned a non-success status.
    #[error("rpc endpoint returned error status")]
    Status {
        /// RPC method being invoked.
        method: &'static str,
        /// HTTP status code returned by the daemon.
        status: u16,
    },
    /// Daemon demanded a session id but did not supply one.
    #[error("session id handshake failed")]
    Handshake {
        /// RPC method being invoked.
        method: &'static str,
    },
    /// Daemon reported a non-success result string.
    #[error("rpc call rejected by daemon")]
    Rpc {
        /// RPC method being invoked.
        method: &'static str,
        /// Result string returned by the daemon.
        result: String,
    },
    /// RPC payload could not be decoded.
    #[error("malformed rpc payload")]
    Malformed {
        /// RPC method being invoked.
        method: &'static str,
        /// Source deserialization error.
        #[source]
        source: serde_json::Error,
    },
    /// Torrent entry carried a field outside the documented value range.
    #[error("torrent field out of range")]
    FieldOutOfRange {
        /// Field that failed to map.
        field: &'static str,
        /// Value reported by the daemon.
        value: i64,
    },
}

/// Convenience alias for Transmission results.
pub type TransmissionResult<T> = Result<T, TransmissionError>;
