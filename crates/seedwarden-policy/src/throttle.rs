//! Bandwidth tier selection from the remote stream census.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PolicyError, PolicyResult};

/// Bandwidth tier applied to download tools while streams are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ThrottleTier {
    /// Cap transfers to the supplied rates.
    Limited {
        /// Download cap in KiB/s.
        download_kib_s: u64,
        /// Upload cap in KiB/s.
        upload_kib_s: u64,
    },
    /// Remove the caps entirely.
    Unlimited,
}

impl ThrottleTier {
    /// Tier that pauses background transfers outright.
    pub const HALT: Self = Self::Limited {
        download_kib_s: 0,
        upload_kib_s: 0,
    };

    /// Download/upload rates in KiB/s, or `None` when unlimited.
    #[must_use]
    pub const fn rates(&self) -> Option<(u64, u64)> {
        match self {
            Self::Limited {
                download_kib_s,
                upload_kib_s,
            } => Some((*download_kib_s, *upload_kib_s)),
            Self::Unlimited => None,
        }
    }

    /// Whether this tier chokes transfers to zero.
    #[must_use]
    pub const fn is_halt(&self) -> bool {
        matches!(
            self,
            Self::Limited {
                download_kib_s: 0,
                upload_kib_s: 0,
            }
        )
    }
}

impl fmt::Display for ThrottleTier {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unlimited => formatter.write_str("unlimited"),
            Self::Limited {
                download_kib_s,
                upload_kib_s,
            } => {
                if self.is_halt() {
                    formatter.write_str("halted")
                } else {
                    write!(formatter, "{download_kib_s}/{upload_kib_s} KiB/s")
                }
            }
        }
    }
}

/// One `count < upper_bound` band of a throttle plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThrottleBand {
    /// Exclusive upper bound on the remote stream count.
    pub below: u64,
    /// Tier applied while the count is under the bound.
    pub tier: ThrottleTier,
}

/// Ordered threshold table mapping a remote stream count to a tier.
///
/// The table is total over the non-negative integers: counts at or above the
/// last bound land on the fallback tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThrottlePlan {
    bands: Vec<ThrottleBand>,
    fallback: ThrottleTier,
}

impl ThrottlePlan {
    /// Build a plan from ordered bands plus the fallback tier.
    ///
    /// # Errors
    ///
    /// Returns an error when no bands are supplied or the bounds are not
    /// strictly increasing.
    pub fn new(bands: Vec<ThrottleBand>, fallback: ThrottleTier) -> PolicyResult<Self> {
        if bands.is_empty() {
            return Err(PolicyError::EmptyPlan);
        }
        for (index, window) in bands.windows(2).enumerate() {
            if window[1].below <= window[0].below {
                return Err(PolicyError::BoundsNotIncreasing {
                    index: index + 1,
                    bound: window[1].below,
                });
            }
        }
        Ok(Self { bands, fallback })
    }

    /// Select the tier for the observed remote stream count.
    #[must_use]
    pub fn select(&self, remote_streams: u64) -> ThrottleTier {
        self.bands
            .iter()
            .find(|band| remote_streams < band.below)
            .map_or(self.fallback, |band| band.tier)
    }

    /// Tier applied once the count exceeds every band.
    #[must_use]
    pub const fn fallback(&self) -> ThrottleTier {
        self.fallback
    }
}

impl Default for ThrottlePlan {
    /// Stock plan: generous limits that tighten with each pair of streams
    /// and a hard halt at seven or more.
    fn default() -> Self {
        Self {
            bands: vec![
                band(1, 20_480, 2_048),
                band(3, 10_240, 1_024),
                band(5, 5_120, 512),
                band(7, 2_560, 256),
            ],
            fallback: ThrottleTier::HALT,
        }
    }
}

const fn band(below: u64, download_kib_s: u64, upload_kib_s: u64) -> ThrottleBand {
    ThrottleBand {
        below,
        tier: ThrottleTier::Limited {
            download_kib_s,
            upload_kib_s,
        },
    }
}
