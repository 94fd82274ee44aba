//! Fan-out of a selected throttle tier across the enabled download tools.

use anyhow::bail;
use tracing::{debug, info, warn};

use seedwarden_policy::{RateLimiter, ThrottleTier};

/// Apply the tier to every limiter, best effort.
///
/// A single tool failing is logged and does not block the others; the
/// pipeline only fails when every tool rejected the tier.
///
/// # Errors
///
/// Returns an error when limiters were supplied and all of them failed.
pub async fn apply_tier(tier: ThrottleTier, limiters: &[Box<dyn RateLimiter>]) -> anyhow::Result<()> {
    if limiters.is_empty() {
        info!(%tier, "no download tools enabled; nothing to throttle");
        return Ok(());
    }

    let mut failures = 0;
    for limiter in limiters {
        match limiter.apply(tier).await {
            Ok(()) => debug!(tool = limiter.name(), %tier, "throttle tier applied"),
            Err(err) => {
                warn!(tool = limiter.name(), error = %err, "failed to apply throttle tier");
                failures += 1;
            }
        }
    }

    if failures == limiters.len() {
        bail!("every download tool rejected the throttle tier");
    }
    Ok(())
}
