//! Settings file loading.

use std::fs;
use std::path::Path;

use crate::error::{ConfigError, ConfigResult};
use crate::model::Settings;
use crate::validate::validate;

/// Load and validate the settings document at `path`.
///
/// # Errors
///
/// Returns an error when the file cannot be read, is not valid JSON for the
/// settings shape, or fails validation.
pub fn load_settings(path: &Path) -> ConfigResult<Settings> {
    let payload = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let settings: Settings =
        serde_json::from_str(&payload).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    validate(&settings)?;
    Ok(settings)
}
