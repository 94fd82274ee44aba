//! Capability traits implemented by download-tool adapters.

use async_trait::async_trait;

use crate::model::{SeedRatioMode, Torrent, TorrentId};
use crate::throttle::ThrottleTier;

/// Narrow control surface the cleanup rules need from a torrent backend.
///
/// Rules depend only on this trait so any client that can list torrents and
/// apply batched mutations can be substituted.
#[async_trait]
pub trait TorrentControl: Send + Sync {
    /// Fetch a fresh snapshot of every torrent known to the client.
    async fn list_torrents(&self) -> anyhow::Result<Vec<Torrent>>;

    /// Pin the seed ratio limit and mode for the supplied torrents.
    async fn set_seed_ratio(
        &self,
        ids: &[TorrentId],
        limit: f64,
        mode: SeedRatioMode,
    ) -> anyhow::Result<()>;

    /// Stop (pause) the supplied torrents.
    async fn stop_torrents(&self, ids: &[TorrentId]) -> anyhow::Result<()>;

    /// Remove the supplied torrents, optionally deleting downloaded data.
    async fn remove_torrents(&self, ids: &[TorrentId], delete_data: bool) -> anyhow::Result<()>;
}

/// Best-effort bandwidth limiter for one download tool.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Stable tool name used in logs.
    fn name(&self) -> &'static str;

    /// Apply the selected tier. Disabled tools should return `Ok` without
    /// issuing any call.
    async fn apply(&self, tier: ThrottleTier) -> anyhow::Result<()>;
}
