//! Rate limiter adapter backed by the daemon's alternate-speed mode.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use seedwarden_config::{AltSpeedMode, TransmissionSettings};
use seedwarden_policy::{RateLimiter, ThrottleTier};

use crate::TransmissionClient;

/// Applies throttle tiers to Transmission via `session-set`.
///
/// A limited tier enables alternate-speed mode with the tier rates (possibly
/// rescaled), the unlimited tier disables it, and a disabled adapter is a
/// logged no-op.
#[derive(Debug, Clone)]
pub struct TransmissionLimiter {
    client: Arc<TransmissionClient>,
    enabled: bool,
    mode: AltSpeedMode,
}

impl TransmissionLimiter {
    /// Wrap a client with the adapter settings.
    #[must_use]
    pub fn new(client: Arc<TransmissionClient>, settings: &TransmissionSettings) -> Self {
        Self {
            client,
            enabled: settings.enabled,
            mode: settings.alt_speed.clone(),
        }
    }

    fn rates_for(&self, tier: ThrottleTier) -> Option<(u64, u64)> {
        tier.rates().map(|(down, up)| match self.mode {
            AltSpeedMode::Absolute => (down, up),
            AltSpeedMode::Scaled { percent, cap_kib_s } => {
                (scale(down, percent, cap_kib_s), scale(up, percent, cap_kib_s))
            }
        })
    }
}

// Widened so extreme configured band rates cannot overflow.
fn scale(rate: u64, percent: u8, cap: u64) -> u64 {
    let scaled = u128::from(rate) * u128::from(percent) / 100;
    u64::try_from(scaled.min(u128::from(cap))).unwrap_or(cap)
}

#[async_trait]
impl RateLimiter for TransmissionLimiter {
    fn name(&self) -> &'static str {
        "transmission"
    }

    async fn apply(&self, tier: ThrottleTier) -> anyhow::Result<()> {
        if !self.enabled {
            debug!(tier = %tier, "transmission limiter disabled; skipping");
            return Ok(());
        }
        self.client.set_alt_speed(self.rates_for(tier)).await?;
        Ok(())
    }
}
