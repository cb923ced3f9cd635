//! Configuration IO helpers.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use dirs_next::config_dir;
use studio_util::{expand_tilde, interpolate_env};
use tracing::{debug, info};

use super::model::{ConfigError, StudioConfig};

/// Environment variable overriding the configuration file location.
pub const CONFIG_PATH_ENV: &str = "STUDIO_CONFIG_PATH";

/// Returns the default path for the studio configuration file.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = env::var(CONFIG_PATH_ENV)
        && !path.trim().is_empty()
    {
        return expand_tilde(&path);
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("studio")
        .join("studio.yaml")
}

/// Loads the configuration from the default path.
pub fn load_config() -> Result<StudioConfig, ConfigError> {
    load_config_from_path(&default_config_path())
}

/// Loads the configuration from a specific path.
///
/// A missing file yields [`StudioConfig::default`]. Files ending in `.json`
/// are parsed as JSON, anything else as YAML. `${env:NAME}` placeholders are
/// resolved before the configuration is returned.
pub fn load_config_from_path(path: &Path) -> Result<StudioConfig, ConfigError> {
    if !path.exists() {
        debug!(path = %path.display(), "no studio config file; using built-in fields");
        return Ok(StudioConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let is_json = path
        .extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| extension.eq_ignore_ascii_case("json"));
    let parsed = if is_json {
        serde_json::from_str::<StudioConfig>(&content).map_err(|error| error.to_string())
    } else {
        serde_yaml::from_str::<StudioConfig>(&content).map_err(|error| error.to_string())
    };
    let mut config = parsed.map_err(|message| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    })?;

    interpolate_config(&mut config)?;
    info!(path = %path.display(), field_count = config.fields.len(), "loaded studio config");
    Ok(config)
}

/// Resolve `${env:NAME}` placeholders in the backend URL and every field URL.
pub fn interpolate_config(config: &mut StudioConfig) -> Result<(), ConfigError> {
    if let Some(backend_url) = config.backend_url.as_mut() {
        *backend_url = interpolate_env(backend_url)?;
    }
    for (name, definition) in config.fields.iter_mut() {
        if let Some(url) = definition.source.url.as_mut() {
            *url = interpolate_env(url)?;
        }
        debug!(field = %name, "interpolated field configuration");
    }
    Ok(())
}
