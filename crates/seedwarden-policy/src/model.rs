//! Torrent snapshot types shared between the policy rules and the client
//! adapters.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier assigned to a torrent by the download client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TorrentId(pub i64);

impl fmt::Display for TorrentId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(formatter)
    }
}

/// Per-torrent seed ratio mode as reported by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedRatioMode {
    /// Follow the client-global ratio setting.
    Global,
    /// Honor a per-torrent ratio override.
    Single,
    /// Seed without a ratio cap.
    Unlimited,
}

/// Client-side torrent lifecycle status, carried through unmodified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TorrentStatus {
    /// Paused; no transfer activity.
    Stopped,
    /// Waiting for a verification slot.
    QueuedToVerify,
    /// Checking downloaded data against the metainfo.
    Verifying,
    /// Waiting for a download slot.
    QueuedToDownload,
    /// Actively downloading.
    Downloading,
    /// Waiting for a seed slot.
    QueuedToSeed,
    /// Actively seeding.
    Seeding,
}

/// Read-only snapshot of one torrent, fetched fresh for each rule pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Torrent {
    /// Client-assigned identifier.
    pub id: TorrentId,
    /// Display name reported by the client.
    pub name: String,
    /// Whether the torrent came from a private tracker.
    pub is_private: bool,
    /// Tracker announce URLs in client order.
    pub trackers: Vec<String>,
    /// Seed ratio mode currently in effect.
    pub seed_ratio_mode: SeedRatioMode,
    /// Lifecycle status at snapshot time.
    pub status: TorrentStatus,
    /// Completion timestamp, absent while the download is still running.
    pub completed_at: Option<DateTime<Utc>>,
}
