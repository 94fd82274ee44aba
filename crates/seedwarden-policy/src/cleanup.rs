//! Fixed-order executor for the torrent lifecycle rules.

use chrono::{Duration, Utc};
use tracing::{debug, info};

use crate::error::{PolicyError, PolicyResult};
use crate::model::SeedRatioMode;
use crate::rules::{
    CleanupReport, select_completed_seeding, select_public_global, select_stale_stopped,
    select_tracker_matched,
};
use crate::service::TorrentControl;

/// Ratio override for torrents announcing to a matched tracker.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerRule {
    /// Substring matched against each announce URL.
    pub needle: String,
    /// Ratio target pinned on matched torrents. May exceed 1 to keep
    /// seeding longer for trackers with health requirements.
    pub ratio: f64,
}

/// Lifecycle policy applied to one torrent client per run.
///
/// Rules execute in a fixed order, each against a snapshot fetched
/// immediately before it evaluates. Later rules therefore observe the
/// mutations earlier rules made in the same run: a torrent pinned to a
/// per-torrent ratio by rule 1 is no longer on the global mode when rule 3
/// fetches, so it keeps seeding until the client stops it at its target.
#[derive(Debug, Clone)]
pub struct CleanupPolicy {
    public_ratio: f64,
    tracker_rule: Option<TrackerRule>,
    grace: Duration,
}

impl CleanupPolicy {
    /// Build a policy from the configured ratio targets and grace window.
    ///
    /// # Errors
    ///
    /// Returns an error when a ratio target is not a finite non-negative
    /// number or the tracker match substring is empty.
    pub fn new(
        public_ratio: f64,
        tracker_rule: Option<TrackerRule>,
        grace: Duration,
    ) -> PolicyResult<Self> {
        validate_ratio(public_ratio)?;
        if let Some(rule) = &tracker_rule {
            validate_ratio(rule.ratio)?;
            if rule.needle.trim().is_empty() {
                return Err(PolicyError::EmptyTrackerMatch);
            }
        }
        Ok(Self {
            public_ratio,
            tracker_rule,
            grace,
        })
    }

    /// Run all rules against the client and report per-rule counts.
    ///
    /// Mutations are not rolled back on failure: if a later rule's client
    /// call fails, changes already applied by earlier rules stand and the
    /// error is surfaced to the caller.
    pub async fn run(&self, client: &dyn TorrentControl) -> anyhow::Result<CleanupReport> {
        let mut report = CleanupReport::default();

        let snapshot = client.list_torrents().await?;
        let ids = select_public_global(&snapshot);
        if !ids.is_empty() {
            client
                .set_seed_ratio(&ids, self.public_ratio, SeedRatioMode::Single)
                .await?;
        }
        debug!(count = ids.len(), ratio = self.public_ratio, "pinned public torrents");
        report.changed += ids.len();

        if let Some(rule) = &self.tracker_rule {
            let snapshot = client.list_torrents().await?;
            let ids = select_tracker_matched(&snapshot, &rule.needle);
            if !ids.is_empty() {
                client
                    .set_seed_ratio(&ids, rule.ratio, SeedRatioMode::Single)
                    .await?;
            }
            debug!(
                count = ids.len(),
                needle = %rule.needle,
                ratio = rule.ratio,
                "pinned tracker-matched torrents"
            );
            report.changed += ids.len();
        }

        let snapshot = client.list_torrents().await?;
        let ids = select_completed_seeding(&snapshot);
        if !ids.is_empty() {
            client.stop_torrents(&ids).await?;
        }
        debug!(count = ids.len(), "stopped completed public seeds");
        report.stopped = ids.len();

        let snapshot = client.list_torrents().await?;
        let ids = select_stale_stopped(&snapshot, Utc::now(), self.grace);
        if !ids.is_empty() {
            client.remove_torrents(&ids, true).await?;
        }
        debug!(count = ids.len(), "deleted stale stopped torrents");
        report.deleted = ids.len();

        info!(
            changed = report.changed,
            stopped = report.stopped,
            deleted = report.deleted,
            "cleanup run complete"
        );
        Ok(report)
    }
}

fn validate_ratio(value: f64) -> PolicyResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(PolicyError::InvalidRatio { value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Torrent, TorrentId, TorrentStatus};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        SetRatio(Vec<TorrentId>, String, SeedRatioMode),
        Stop(Vec<TorrentId>),
        Remove(Vec<TorrentId>, bool),
    }

    /// Serves one scripted snapshot per `list_torrents` call; the last
    /// snapshot repeats once the script runs out.
    struct ScriptedClient {
        snapshots: Mutex<Vec<Vec<Torrent>>>,
        calls: Mutex<Vec<Call>>,
        fail_on_stop: bool,
    }

    impl ScriptedClient {
        fn new(snapshots: Vec<Vec<Torrent>>) -> Self {
            Self {
                snapshots: Mutex::new(snapshots),
                calls: Mutex::new(Vec::new()),
                fail_on_stop: false,
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().expect("calls lock").clone()
        }

        fn record(&self, call: Call) {
            self.calls.lock().expect("calls lock").push(call);
        }
    }

    #[async_trait]
    impl TorrentControl for ScriptedClient {
        async fn list_torrents(&self) -> anyhow::Result<Vec<Torrent>> {
            let mut snapshots = self.snapshots.lock().expect("snapshots lock");
            if snapshots.len() > 1 {
                Ok(snapshots.remove(0))
            } else {
                Ok(snapshots.first().cloned().unwrap_or_default())
            }
        }

        async fn set_seed_ratio(
            &self,
            ids: &[TorrentId],
            limit: f64,
            mode: SeedRatioMode,
        ) -> anyhow::Result<()> {
            self.record(Call::SetRatio(ids.to_vec(), format!("{limit}"), mode));
            Ok(())
        }

        async fn stop_torrents(&self, ids: &[TorrentId]) -> anyhow::Result<()> {
            if self.fail_on_stop {
                anyhow::bail!("stop rejected");
            }
            self.record(Call::Stop(ids.to_vec()));
            Ok(())
        }

        async fn remove_torrents(
            &self,
            ids: &[TorrentId],
            delete_data: bool,
        ) -> anyhow::Result<()> {
            self.record(Call::Remove(ids.to_vec(), delete_data));
            Ok(())
        }
    }

    fn torrent(id: i64, status: TorrentStatus, mode: SeedRatioMode) -> Torrent {
        Torrent {
            id: TorrentId(id),
            name: format!("torrent-{id}"),
            is_private: false,
            trackers: Vec::new(),
            seed_ratio_mode: mode,
            status,
            completed_at: None,
        }
    }

    fn policy() -> CleanupPolicy {
        CleanupPolicy::new(0.001, None, Duration::seconds(7_200)).expect("valid policy")
    }

    #[tokio::test]
    async fn later_rules_observe_earlier_mutations() {
        // Rule 1 pins torrent 1; the refetched snapshot shows the pinned
        // mode, so rule 3 must not stop it this run.
        let before = vec![torrent(1, TorrentStatus::Seeding, SeedRatioMode::Global)];
        let after = vec![torrent(1, TorrentStatus::Seeding, SeedRatioMode::Single)];
        let client = ScriptedClient::new(vec![before, after]);

        let report = policy().run(&client).await.expect("run succeeds");

        assert_eq!(report.changed, 1);
        assert_eq!(report.stopped, 0);
        assert_eq!(report.deleted, 0);
        assert_eq!(
            client.calls(),
            vec![Call::SetRatio(
                vec![TorrentId(1)],
                "0.001".to_string(),
                SeedRatioMode::Single
            )]
        );
    }

    #[tokio::test]
    async fn full_run_reports_per_rule_counts() {
        let mut private = torrent(2, TorrentStatus::Seeding, SeedRatioMode::Global);
        private.is_private = true;
        let mut stale = torrent(3, TorrentStatus::Stopped, SeedRatioMode::Single);
        stale.completed_at = Some(Utc::now() - Duration::seconds(9_000));
        let mut still_seeding = torrent(4, TorrentStatus::Seeding, SeedRatioMode::Global);
        still_seeding.trackers = vec!["http://nyaa.example/announce".to_string()];

        let snapshot = vec![
            torrent(1, TorrentStatus::Seeding, SeedRatioMode::Global),
            private,
            stale,
            still_seeding,
        ];
        let client = ScriptedClient::new(vec![snapshot]);

        let policy = CleanupPolicy::new(
            0.001,
            Some(TrackerRule {
                needle: "nyaa".to_string(),
                ratio: 10.0,
            }),
            Duration::seconds(7_200),
        )
        .expect("valid policy");

        let report = policy.run(&client).await.expect("run succeeds");

        // Same snapshot is served to every rule here, so the seeding
        // torrents are still on the global mode when rule 3 fetches.
        assert_eq!(report.changed, 3);
        assert_eq!(report.stopped, 2);
        assert_eq!(report.deleted, 1);

        let calls = client.calls();
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[3], Call::Remove(vec![TorrentId(3)], true));
    }

    #[tokio::test]
    async fn empty_selections_issue_no_mutations() {
        let mut private = torrent(1, TorrentStatus::Seeding, SeedRatioMode::Global);
        private.is_private = true;
        let client = ScriptedClient::new(vec![vec![private]]);

        let report = policy().run(&client).await.expect("run succeeds");

        assert_eq!(report, CleanupReport::default());
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn failure_keeps_earlier_mutations_and_surfaces_error() {
        let mut client = ScriptedClient::new(vec![vec![torrent(
            1,
            TorrentStatus::Seeding,
            SeedRatioMode::Global,
        )]]);
        client.fail_on_stop = true;

        let err = policy().run(&client).await.expect_err("stop should fail");
        assert!(err.to_string().contains("stop rejected"));
        // Rule 1's mutation was already applied before the failure.
        assert_eq!(client.calls().len(), 1);
    }

    #[test]
    fn policy_rejects_invalid_ratio_targets() {
        let err = CleanupPolicy::new(f64::NAN, None, Duration::seconds(1))
            .expect_err("nan ratio should fail");
        assert!(matches!(err, PolicyError::InvalidRatio { .. }));

        let err = CleanupPolicy::new(
            0.5,
            Some(TrackerRule {
                needle: "  ".to_string(),
                ratio: 1.0,
            }),
            Duration::seconds(1),
        )
        .expect_err("blank needle should fail");
        assert!(matches!(err, PolicyError::EmptyTrackerMatch));
    }
}
