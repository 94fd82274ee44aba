//! Command-line surface and pipeline dispatch.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::info;

use seedwarden_config::{Settings, load_settings};
use seedwarden_plex::PlexClient;
use seedwarden_policy::RateLimiter;
use seedwarden_sabnzbd::SabnzbdLimiter;
use seedwarden_telemetry::{LogFormat, LoggingConfig, init_logging};
use seedwarden_transmission::{TransmissionClient, TransmissionLimiter};

use crate::error::{AppError, AppResult};
use crate::pipeline;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_CONFIG_PATH: &str = "/etc/seedwarden/config.json";

/// Media-server aware download throttling and torrent lifecycle cleanup.
#[derive(Debug, Parser)]
#[command(name = "seedwarden", version, about)]
pub struct Cli {
    /// Path to the JSON settings file.
    #[arg(
        long,
        global = true,
        env = "SEEDWARDEN_CONFIG",
        default_value = DEFAULT_CONFIG_PATH
    )]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Match download bandwidth to remote media stream activity.
    Throttle,
    /// Apply the torrent lifecycle policy to Transmission.
    Cleanup,
    /// Run the throttle pipeline, then the cleanup pipeline.
    Run,
}

/// Parse arguments, execute the selected pipelines, and return the process
/// exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    match execute(cli).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

async fn execute(cli: Cli) -> AppResult<()> {
    let settings = load_settings(&cli.config)?;
    init_logging(&LoggingConfig {
        level: &settings.log.level,
        format: LogFormat::from_name(settings.log.format.as_deref()),
    })
    .map_err(AppError::Upstream)?;

    match cli.command {
        Command::Throttle => throttle(&settings).await,
        Command::Cleanup => cleanup(&settings).await,
        Command::Run => {
            throttle(&settings).await?;
            cleanup(&settings).await
        }
    }
}

async fn throttle(settings: &Settings) -> AppResult<()> {
    let plan = settings.throttle_plan()?;
    let plex = PlexClient::new(&settings.plex, REQUEST_TIMEOUT).map_err(AppError::upstream)?;
    let census = plex.census().await.map_err(AppError::upstream)?;

    let remote = u64::try_from(census.remote).unwrap_or(u64::MAX);
    let tier = plan.select(remote);

    let limiters = build_limiters(settings)?;
    pipeline::apply_tier(tier, &limiters)
        .await
        .map_err(AppError::Upstream)?;

    println!(
        "[{}] active remote streams: {} (tier: {tier})",
        timestamp(),
        census.remote
    );
    Ok(())
}

async fn cleanup(settings: &Settings) -> AppResult<()> {
    if !settings.transmission.enabled {
        info!("transmission disabled; skipping cleanup");
        return Ok(());
    }

    let policy = settings.cleanup_policy()?;
    let client = TransmissionClient::new(&settings.transmission, REQUEST_TIMEOUT)
        .map_err(AppError::upstream)?;
    let report = policy.run(&client).await.map_err(AppError::Upstream)?;

    println!(
        "[{}] torrents changed: {}, stopped: {}, deleted: {}",
        timestamp(),
        report.changed,
        report.stopped,
        report.deleted
    );
    Ok(())
}

fn build_limiters(settings: &Settings) -> AppResult<Vec<Box<dyn RateLimiter>>> {
    let mut limiters: Vec<Box<dyn RateLimiter>> = Vec::new();
    if settings.sabnzbd.enabled {
        let limiter =
            SabnzbdLimiter::new(&settings.sabnzbd, REQUEST_TIMEOUT).map_err(AppError::upstream)?;
        limiters.push(Box::new(limiter));
    }
    if settings.transmission.enabled {
        let client = TransmissionClient::new(&settings.transmission, REQUEST_TIMEOUT)
            .map_err(AppError::upstream)?;
        limiters.push(Box::new(TransmissionLimiter::new(
            Arc::new(client),
            &settings.transmission,
        )));
    }
    Ok(limiters)
}

fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_with(value: serde_json::Value) -> Settings {
        serde_json::from_value(value).expect("settings parse")
    }

    #[test]
    fn cli_parses_subcommands_and_config_flag() {
        let cli = Cli::try_parse_from(["seedwarden", "--config", "/tmp/sw.json", "throttle"])
            .expect("valid invocation");
        assert_eq!(cli.config, PathBuf::from("/tmp/sw.json"));
        assert!(matches!(cli.command, Command::Throttle));
    }

    #[test]
    fn cli_defaults_the_config_path() {
        let cli = Cli::try_parse_from(["seedwarden", "run"]).expect("valid invocation");
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_PATH));
        assert!(matches!(cli.command, Command::Run));
    }

    #[test]
    fn cli_requires_a_subcommand() {
        Cli::try_parse_from(["seedwarden"]).expect_err("missing subcommand should fail");
    }

    #[test]
    fn no_tools_enabled_yields_no_limiters() {
        let settings = settings_with(serde_json::json!({
            "plex": { "token": "secret" }
        }));
        let limiters = build_limiters(&settings).expect("limiters build");
        assert!(limiters.is_empty());
    }

    #[tokio::test]
    async fn cleanup_skips_when_transmission_is_disabled() {
        let settings = settings_with(serde_json::json!({
            "plex": { "token": "secret" },
            "transmission": { "enabled": false }
        }));
        cleanup(&settings).await.expect("disabled cleanup is a no-op");
    }

    #[test]
    fn timestamp_matches_the_summary_format() {
        let stamp = timestamp();
        assert_eq!(stamp.len(), 19);
        assert_eq!(&stamp[4..5], "-");
        assert_eq!(&stamp[10..11], " ");
        assert_eq!(&stamp[13..14], ":");
    }
}
