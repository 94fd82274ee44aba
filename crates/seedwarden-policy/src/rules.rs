//! Eligibility predicates for the torrent lifecycle rules.
//!
//! Each rule is a pure filter over a snapshot; mutation happens in the
//! executor via one batched client call per rule.

use chrono::{DateTime, Duration, Utc};

use crate::model::{SeedRatioMode, Torrent, TorrentId, TorrentStatus};

/// Per-rule counts reported after a cleanup run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Torrents whose seed ratio was pinned (rules 1 and 2 combined).
    pub changed: usize,
    /// Torrents stopped after finishing their seeding obligation.
    pub stopped: usize,
    /// Torrents removed along with their data.
    pub deleted: usize,
}

/// Public torrents still on the client-global ratio, due for a pinned ratio.
#[must_use]
pub fn select_public_global(torrents: &[Torrent]) -> Vec<TorrentId> {
    select(torrents, |torrent| {
        !torrent.is_private && torrent.seed_ratio_mode == SeedRatioMode::Global
    })
}

/// Public torrents announcing to a tracker whose URL contains `needle`.
#[must_use]
pub fn select_tracker_matched(torrents: &[Torrent], needle: &str) -> Vec<TorrentId> {
    select(torrents, |torrent| {
        !torrent.is_private
            && torrent
                .trackers
                .iter()
                .any(|announce| announce.contains(needle))
    })
}

/// Public seeding torrents still on the global ratio mode.
///
/// Torrents already pinned to a per-torrent ratio are left alone; the client
/// stops them itself once the pinned target is reached.
#[must_use]
pub fn select_completed_seeding(torrents: &[Torrent]) -> Vec<TorrentId> {
    select(torrents, |torrent| {
        !torrent.is_private
            && torrent.status == TorrentStatus::Seeding
            && torrent.seed_ratio_mode == SeedRatioMode::Global
    })
}

/// Public stopped torrents whose completion is older than the grace window.
///
/// The window is strict: a torrent completed exactly `grace` ago is kept.
#[must_use]
pub fn select_stale_stopped(
    torrents: &[Torrent],
    now: DateTime<Utc>,
    grace: Duration,
) -> Vec<TorrentId> {
    select(torrents, |torrent| {
        !torrent.is_private
            && torrent.status == TorrentStatus::Stopped
            && torrent
                .completed_at
                .is_some_and(|completed| now - completed > grace)
    })
}

fn select(torrents: &[Torrent], eligible: impl Fn(&Torrent) -> bool) -> Vec<TorrentId> {
    torrents
        .iter()
        .filter(|torrent| eligible(torrent))
        .map(|torrent| torrent.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn torrent(id: i64) -> Torrent {
        Torrent {
            id: TorrentId(id),
            name: format!("torrent-{id}"),
            is_private: false,
            trackers: Vec::new(),
            seed_ratio_mode: SeedRatioMode::Global,
            status: TorrentStatus::Seeding,
            completed_at: None,
        }
    }

    #[test]
    fn public_global_skips_private_and_pinned() {
        let mut pinned = torrent(2);
        pinned.seed_ratio_mode = SeedRatioMode::Single;
        let mut private = torrent(3);
        private.is_private = true;

        let snapshot = vec![torrent(1), pinned, private];
        assert_eq!(select_public_global(&snapshot), vec![TorrentId(1)]);
    }

    #[test]
    fn public_global_is_idempotent_after_pinning() {
        let mut already_pinned = torrent(1);
        already_pinned.seed_ratio_mode = SeedRatioMode::Single;
        assert!(select_public_global(&[already_pinned]).is_empty());
    }

    #[test]
    fn tracker_match_uses_substring_over_any_announce() {
        let mut matched = torrent(1);
        matched.trackers = vec![
            "http://other.example/announce".to_string(),
            "http://nyaa.example/announce".to_string(),
        ];
        let mut unmatched = torrent(2);
        unmatched.trackers = vec!["http://other.example/announce".to_string()];
        let mut private = torrent(3);
        private.is_private = true;
        private.trackers = vec!["http://nyaa.example/announce".to_string()];

        let snapshot = vec![matched, unmatched, private];
        assert_eq!(select_tracker_matched(&snapshot, "nyaa"), vec![TorrentId(1)]);
    }

    #[test]
    fn completed_seeding_requires_global_mode() {
        let seeding_global = torrent(1);
        let mut seeding_pinned = torrent(2);
        seeding_pinned.seed_ratio_mode = SeedRatioMode::Single;
        let mut downloading = torrent(3);
        downloading.status = TorrentStatus::Downloading;

        let snapshot = vec![seeding_global, seeding_pinned, downloading];
        assert_eq!(select_completed_seeding(&snapshot), vec![TorrentId(1)]);
    }

    #[test]
    fn stale_window_is_strictly_greater_than() {
        let now = Utc::now();
        let grace = Duration::seconds(7_200);

        let mut at_bound = torrent(1);
        at_bound.status = TorrentStatus::Stopped;
        at_bound.completed_at = Some(now - Duration::seconds(7_200));

        let mut past_bound = torrent(2);
        past_bound.status = TorrentStatus::Stopped;
        past_bound.completed_at = Some(now - Duration::seconds(7_201));

        let mut never_completed = torrent(3);
        never_completed.status = TorrentStatus::Stopped;

        let snapshot = vec![at_bound, past_bound, never_completed];
        assert_eq!(
            select_stale_stopped(&snapshot, now, grace),
            vec![TorrentId(2)]
        );
    }

    #[test]
    fn stale_selection_ignores_running_torrents() {
        let now = Utc::now();
        let mut still_seeding = torrent(1);
        still_seeding.completed_at = Some(now - Duration::seconds(9_000));

        assert!(select_stale_stopped(&[still_seeding], now, Duration::seconds(7_200)).is_empty());
    }
}
