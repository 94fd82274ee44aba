//! Cross-field validation applied after deserialization and before any
//! network call.

use crate::error::{ConfigError, ConfigResult};
use crate::model::{AltSpeedMode, Settings};

/// Validate a settings document.
///
/// Credential checks are deliberately front-loaded: an enabled tool with a
/// missing credential is a fatal configuration error surfaced before the
/// pipelines issue a single request.
///
/// # Errors
///
/// Returns the first failing field.
pub fn validate(settings: &Settings) -> ConfigResult<()> {
    if settings.plex.host.trim().is_empty() {
        return Err(invalid("plex", "host", "must not be empty"));
    }
    if settings.plex.token.trim().is_empty() {
        return Err(ConfigError::MissingCredential {
            section: "plex",
            field: "token",
        });
    }

    if settings.sabnzbd.enabled {
        if settings.sabnzbd.host.trim().is_empty() {
            return Err(invalid("sabnzbd", "host", "must not be empty"));
        }
        let has_key = settings
            .sabnzbd
            .api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty());
        if !has_key {
            return Err(ConfigError::MissingCredential {
                section: "sabnzbd",
                field: "api_key",
            });
        }
    }

    if settings.transmission.enabled {
        if settings.transmission.host.trim().is_empty() {
            return Err(invalid("transmission", "host", "must not be empty"));
        }
        if settings.transmission.password.is_some() && settings.transmission.username.is_none() {
            return Err(invalid(
                "transmission",
                "password",
                "requires username to be set",
            ));
        }
        if let AltSpeedMode::Scaled { percent, .. } = settings.transmission.alt_speed {
            if percent == 0 || percent > 100 {
                return Err(ConfigError::InvalidField {
                    section: "transmission",
                    field: "alt_speed.percent",
                    value: Some(percent.to_string()),
                    reason: "must be between 1 and 100",
                });
            }
        }
    }

    // Surfaces empty/unordered band tables and bad ratio targets.
    settings.throttle_plan()?;
    settings.cleanup_policy()?;

    Ok(())
}

const fn invalid(
    section: &'static str,
    field: &'static str,
    reason: &'static str,
) -> ConfigError {
    ConfigError::InvalidField {
        section,
        field,
        value: None,
        reason,
    }
}
