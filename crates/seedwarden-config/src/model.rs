//! Typed settings models and their defaults.
//!
//! # Design
//! - Pure data carriers deserialized from the settings file.
//! - Constructed once at startup and passed by reference; nothing in the
//!   workspace reads configuration from ambient state.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use seedwarden_policy::{
    CleanupPolicy, PolicyError, ThrottleBand, ThrottlePlan, ThrottleTier, TrackerRule,
};

/// Root settings document for both pipelines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Logging preferences.
    #[serde(default)]
    pub log: LogSettings,
    /// Media server session endpoint.
    pub plex: PlexSettings,
    /// SABnzbd speed-limit adapter.
    #[serde(default)]
    pub sabnzbd: SabnzbdSettings,
    /// Transmission RPC endpoint and cleanup targets.
    #[serde(default)]
    pub transmission: TransmissionSettings,
    /// Throttle tier table.
    #[serde(default)]
    pub throttle: ThrottleSettings,
    /// Torrent lifecycle targets.
    #[serde(default)]
    pub cleanup: CleanupSettings,
}

impl Settings {
    /// Build the throttle plan from the configured bands.
    ///
    /// # Errors
    ///
    /// Returns an error when the band table is empty or its bounds are not
    /// strictly increasing.
    pub fn throttle_plan(&self) -> ConfigResult<ThrottlePlan> {
        let bands = self
            .throttle
            .bands
            .iter()
            .map(|band| ThrottleBand {
                below: band.below,
                tier: band.rates.tier(),
            })
            .collect();
        let fallback = self
            .throttle
            .fallback
            .as_ref()
            .map_or(ThrottleTier::HALT, RateSettings::tier);
        ThrottlePlan::new(bands, fallback).map_err(|err| invalid_policy("throttle", "bands", err))
    }

    /// Build the cleanup policy from the configured targets.
    ///
    /// # Errors
    ///
    /// Returns an error when a ratio target or tracker match is invalid.
    pub fn cleanup_policy(&self) -> ConfigResult<CleanupPolicy> {
        let tracker_rule = self.cleanup.tracker.as_ref().map(|tracker| TrackerRule {
            needle: tracker.contains.clone(),
            ratio: tracker.ratio_limit,
        });
        CleanupPolicy::new(
            self.cleanup.public_ratio_limit,
            tracker_rule,
            self.cleanup.grace(),
        )
        .map_err(|err| invalid_policy("cleanup", "ratio targets", err))
    }
}

fn invalid_policy(section: &'static str, field: &'static str, err: PolicyError) -> ConfigError {
    let reason = match err {
        PolicyError::EmptyPlan => "band table is empty",
        PolicyError::BoundsNotIncreasing { .. } => "bounds must be strictly increasing",
        PolicyError::InvalidRatio { .. } => "ratio must be a finite non-negative number",
        PolicyError::EmptyTrackerMatch => "tracker match substring is empty",
    };
    ConfigError::InvalidField {
        section,
        field,
        value: None,
        reason,
    }
}

/// Logging preferences applied before any network call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSettings {
    /// Log level used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format override: `json` or `pretty`. Inferred when absent.
    #[serde(default)]
    pub format: Option<String>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Media server session endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlexSettings {
    /// Host name or address of the media server.
    #[serde(default = "default_host")]
    pub host: String,
    /// HTTP port of the media server.
    #[serde(default = "default_plex_port")]
    pub port: u16,
    /// Access token sent in the `X-Plex-Token` header.
    pub token: String,
}

const fn default_plex_port() -> u16 {
    32_400
}

fn default_host() -> String {
    "localhost".to_string()
}

/// SABnzbd speed-limit adapter settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SabnzbdSettings {
    /// Whether the adapter issues calls at all.
    #[serde(default)]
    pub enabled: bool,
    /// Host name or address of the SABnzbd instance.
    #[serde(default = "default_host")]
    pub host: String,
    /// HTTP port of the SABnzbd instance.
    #[serde(default = "default_sabnzbd_port")]
    pub port: u16,
    /// API key required for every call; mandatory when enabled.
    #[serde(default)]
    pub api_key: Option<String>,
}

// Kept in lockstep with the serde field defaults: an omitted section must
// behave exactly like an empty `{}` section.
impl Default for SabnzbdSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            host: default_host(),
            port: default_sabnzbd_port(),
            api_key: None,
        }
    }
}

const fn default_sabnzbd_port() -> u16 {
    8_080
}

/// Transmission RPC endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransmissionSettings {
    /// Whether the throttle adapter and cleanup pipeline run against this
    /// instance.
    #[serde(default)]
    pub enabled: bool,
    /// Host name or address of the Transmission daemon.
    #[serde(default = "default_host")]
    pub host: String,
    /// RPC port of the Transmission daemon.
    #[serde(default = "default_transmission_port")]
    pub port: u16,
    /// Optional basic-auth user.
    #[serde(default)]
    pub username: Option<String>,
    /// Optional basic-auth password; requires `username`.
    #[serde(default)]
    pub password: Option<String>,
    /// How throttle tiers translate into alternate-speed rates.
    #[serde(default)]
    pub alt_speed: AltSpeedMode,
}

impl Default for TransmissionSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            host: default_host(),
            port: default_transmission_port(),
            username: None,
            password: None,
            alt_speed: AltSpeedMode::default(),
        }
    }
}

const fn default_transmission_port() -> u16 {
    9_091
}

/// Translation from a throttle tier to Transmission alternate-speed rates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AltSpeedMode {
    /// Pass the tier's rates through unchanged.
    #[default]
    Absolute,
    /// Apply `rate * percent / 100`, capped at `cap_kib_s`, per direction.
    Scaled {
        /// Percentage of the tier rate to apply (1-100).
        percent: u8,
        /// Absolute ceiling in KiB/s.
        cap_kib_s: u64,
    },
}

/// Rate pair used by throttle bands and the fallback tier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RateSettings {
    /// Download cap in KiB/s.
    pub download_kib_s: u64,
    /// Upload cap in KiB/s.
    pub upload_kib_s: u64,
}

impl RateSettings {
    const fn tier(&self) -> ThrottleTier {
        ThrottleTier::Limited {
            download_kib_s: self.download_kib_s,
            upload_kib_s: self.upload_kib_s,
        }
    }
}

/// One band of the throttle table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BandSettings {
    /// Exclusive upper bound on the remote stream count.
    pub below: u64,
    /// Rates applied while the count is under the bound.
    #[serde(flatten)]
    pub rates: RateSettings,
}

/// Throttle tier table settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThrottleSettings {
    /// Ordered bands; bounds must be strictly increasing.
    #[serde(default = "default_bands")]
    pub bands: Vec<BandSettings>,
    /// Rates applied at/above the last bound. Absent means halt (0/0).
    #[serde(default)]
    pub fallback: Option<RateSettings>,
}

impl Default for ThrottleSettings {
    fn default() -> Self {
        Self {
            bands: default_bands(),
            fallback: None,
        }
    }
}

fn default_bands() -> Vec<BandSettings> {
    let band = |below, download_kib_s, upload_kib_s| BandSettings {
        below,
        rates: RateSettings {
            download_kib_s,
            upload_kib_s,
        },
    };
    vec![
        band(1, 20_480, 2_048),
        band(3, 10_240, 1_024),
        band(5, 5_120, 512),
        band(7, 2_560, 256),
    ]
}

/// Torrent lifecycle targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupSettings {
    /// Ratio pinned on public torrents still following the global mode.
    #[serde(default = "default_public_ratio")]
    pub public_ratio_limit: f64,
    /// Optional ratio override for a matched tracker.
    #[serde(default)]
    pub tracker: Option<TrackerSettings>,
    /// Seconds a stopped torrent must be complete before deletion.
    #[serde(default = "default_grace_secs")]
    pub stale_grace_secs: u64,
}

impl CleanupSettings {
    /// Grace window as a duration. Values beyond the representable range
    /// clamp to the maximum, which keeps every torrent ineligible.
    #[must_use]
    pub fn grace(&self) -> Duration {
        i64::try_from(self.stale_grace_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX)
    }
}

impl Default for CleanupSettings {
    fn default() -> Self {
        Self {
            public_ratio_limit: default_public_ratio(),
            tracker: None,
            stale_grace_secs: default_grace_secs(),
        }
    }
}

const fn default_public_ratio() -> f64 {
    0.001
}

const fn default_grace_secs() -> u64 {
    7_200
}

/// Ratio override for torrents announcing to a matched tracker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerSettings {
    /// Substring matched against announce URLs.
    pub contains: String,
    /// Ratio pinned on matched torrents; may exceed 1.
    #[serde(default = "default_tracker_ratio")]
    pub ratio_limit: f64,
}

const fn default_tracker_ratio() -> f64 {
    10.0
}
