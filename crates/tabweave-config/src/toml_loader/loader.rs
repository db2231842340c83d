use std::path::Path;

use tabweave_common::ConfigError;
use tracing::info;

use crate::schema::TabweaveConfig;
use crate::validation;

use super::paths::{create_default_config, default_config_path};

/// Load config from a specific TOML file path.
///
/// Missing fields take serde defaults. A config that parses but fails
/// validation is returned as `ConfigError::ValidationError`; the caller
/// decides whether to fall back to defaults once logging is up.
pub fn load_from_path(path: &Path) -> Result<TabweaveConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        ConfigError::ParseError(format!("failed to read {}: {e}", path.display()))
    })?;

    let config: TabweaveConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    validation::validate(&config)?;

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load config from the platform-specific default path, writing a
/// commented default file first if none exists.
pub fn load_default() -> Result<TabweaveConfig, ConfigError> {
    let path = default_config_path()?;

    if !path.exists() {
        info!("no config found at {}, creating default", path.display());
        create_default_config(&path)?;
        return Ok(TabweaveConfig::default());
    }

    load_from_path(&path)
}
