//! Application error with process exit-code mapping.

use std::error::Error as _;

use thiserror::Error;

use seedwarden_config::ConfigError;

/// Top-level application error.
#[derive(Debug, Error)]
pub enum AppError {
    /// Settings could not be loaded or validated. Exit code 2.
    #[error("configuration error")]
    Config(#[from] ConfigError),
    /// A media server or download tool call failed. Exit code 1.
    #[error("upstream call failed")]
    Upstream(#[source] anyhow::Error),
}

impl AppError {
    /// Wrap any upstream failure.
    pub fn upstream(err: impl Into<anyhow::Error>) -> Self {
        Self::Upstream(err.into())
    }

    /// Process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Upstream(_) => 1,
            Self::Config(_) => 2,
        }
    }

    /// Message printed to stderr before exiting.
    #[must_use]
    pub fn display_message(&self) -> String {
        match self {
            Self::Config(err) => err.source().map_or_else(
                || err.to_string(),
                |source| format!("{err}: {source}"),
            ),
            Self::Upstream(err) => format!("{err:#}"),
        }
    }
}

/// Convenience alias for application results.
pub type AppResult<T> = Result<T, AppError>;
