//! Error types for configuration operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Settings file could not be read.
    #[error("failed to read settings file")]
    Io {
        /// Path that failed to load.
        path: PathBuf,
        /// Source IO error.
        #[source]
        source: io::Error,
    },
    /// Settings file was not valid JSON for the expected shape.
    #[error("settings file is not valid JSON")]
    Parse {
        /// Path that failed to parse.
        path: PathBuf,
        /// Source deserialization error.
        #[source]
        source: serde_json::Error,
    },
    /// Field contained an invalid value.
    #[error("invalid configuration field")]
    InvalidField {
        /// Section that failed validation.
        section: &'static str,
        /// Field that failed validation.
        field: &'static str,
        /// Offending value when available.
        value: Option<String>,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
    /// A tool is enabled but its required credential is absent.
    #[error("missing credential for enabled tool")]
    MissingCredential {
        /// Section describing the tool.
        section: &'static str,
        /// Credential field that is required.
        field: &'static str,
    },
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;
