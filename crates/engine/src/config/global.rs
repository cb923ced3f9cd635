use once_cell::sync::OnceCell;

use super::model::{ConfigError, StudioConfig};

static INSTALLED: OnceCell<StudioConfig> = OnceCell::new();

/// Install the process-wide configuration. Only the first call succeeds.
pub fn install(config: StudioConfig) -> Result<&'static StudioConfig, ConfigError> {
    INSTALLED.set(config).map_err(|_| ConfigError::AlreadyInstalled)?;
    INSTALLED.get().ok_or(ConfigError::AlreadyInstalled)
}

/// The configuration passed to [`install`], if any.
pub fn installed() -> Option<&'static StudioConfig> {
    INSTALLED.get()
}
