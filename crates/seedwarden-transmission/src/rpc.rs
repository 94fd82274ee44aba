//! Wire DTOs for the Transmission RPC envelope and torrent listings.

use chrono::DateTime;
use serde::Deserialize;
use serde_json::Value;

use seedwarden_policy::{SeedRatioMode, Torrent, TorrentId, TorrentStatus};

use crate::error::{TransmissionError, TransmissionResult};

/// Top-level RPC response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct RpcEnvelope {
    pub result: String,
    #[serde(default)]
    pub arguments: Value,
}

/// `torrent-get` response arguments.
#[derive(Debug, Deserialize)]
pub(crate) struct TorrentListing {
    #[serde(default)]
    pub torrents: Vec<TorrentEntry>,
}

/// One torrent as reported by `torrent-get`.
#[derive(Debug, Deserialize)]
pub(crate) struct TorrentEntry {
    id: i64,
    #[serde(default)]
    name: String,
    #[serde(rename = "isPrivate", default)]
    is_private: bool,
    #[serde(default)]
    trackers: Vec<TrackerEntry>,
    #[serde(rename = "seedRatioMode", default)]
    seed_ratio_mode: i64,
    #[serde(default)]
    status: i64,
    #[serde(rename = "doneDate", default)]
    done_date: i64,
}

#[derive(Debug, Deserialize)]
struct TrackerEntry {
    #[serde(default)]
    announce: String,
}

impl TorrentEntry {
    /// Map the wire entry onto the policy snapshot type.
    pub(crate) fn into_snapshot(self) -> TransmissionResult<Torrent> {
        let status = decode_status(self.status)?;
        let seed_ratio_mode = decode_ratio_mode(self.seed_ratio_mode)?;
        // doneDate is 0 for torrents that never finished downloading.
        let completed_at = (self.done_date > 0)
            .then(|| DateTime::from_timestamp(self.done_date, 0))
            .flatten();
        Ok(Torrent {
            id: TorrentId(self.id),
            name: self.name,
            is_private: self.is_private,
            trackers: self
                .trackers
                .into_iter()
                .map(|tracker| tracker.announce)
                .collect(),
            seed_ratio_mode,
            status,
            completed_at,
        })
    }
}

fn decode_status(value: i64) -> TransmissionResult<TorrentStatus> {
    match value {
        0 => Ok(TorrentStatus::Stopped),
        1 => Ok(TorrentStatus::QueuedToVerify),
        2 => Ok(TorrentStatus::Verifying),
        3 => Ok(TorrentStatus::QueuedToDownload),
        4 => Ok(TorrentStatus::Downloading),
        5 => Ok(TorrentStatus::QueuedToSeed),
        6 => Ok(TorrentStatus::Seeding),
        other => Err(TransmissionError::FieldOutOfRange {
            field: "status",
            value: other,
        }),
    }
}

fn decode_ratio_mode(value: i64) -> TransmissionResult<SeedRatioMode> {
    match value {
        0 => Ok(SeedRatioMode::Global),
        1 => Ok(SeedRatioMode::Single),
        2 => Ok(SeedRatioMode::Unlimited),
        other => Err(TransmissionError::FieldOutOfRange {
            field: "seedRatioMode",
            value: other,
        }),
    }
}

/// Wire code for a seed-ratio mode, as used by `torrent-set`.
#[must_use]
pub(crate) const fn ratio_mode_code(mode: SeedRatioMode) -> i64 {
    match mode {
        SeedRatioMode::Global => 0,
        SeedRatioMode::Single => 1,
        SeedRatioMode::Unlimited => 2,
    }
}
