//! Error types for policy construction.

use thiserror::Error;

/// Primary error type for policy configuration.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// Throttle plan was constructed without any bands.
    #[error("throttle plan has no bands")]
    EmptyPlan,
    /// Throttle plan bounds were not strictly increasing.
    #[error("throttle plan bounds must be strictly increasing")]
    BoundsNotIncreasing {
        /// Index of the offending band.
        index: usize,
        /// Bound that failed the ordering check.
        bound: u64,
    },
    /// Seed ratio target was not a finite, non-negative number.
    #[error("invalid seed ratio target")]
    InvalidRatio {
        /// Value supplied by the caller.
        value: f64,
    },
    /// Tracker match substring was empty.
    #[error("tracker match substring is empty")]
    EmptyTrackerMatch,
}

/// Convenience alias for policy results.
pub type PolicyResult<T> = Result<T, PolicyError>;
