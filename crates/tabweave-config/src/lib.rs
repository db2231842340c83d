//! tabweave configuration.
//!
//! TOML-based configuration with validation. Every section uses serde
//! defaults so a partial file (or no file at all) yields a working config.
//!
//! ```rust,no_run
//! use tabweave_config::{load_config, config_to_json};
//!
//! let config = load_config().expect("failed to load config");
//! println!("{}", config_to_json(&config));
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{TabweaveConfig, CONFIG_SCHEMA_VERSION};
pub use toml_loader::{default_config_path, load_default, load_from_path};

use std::path::Path;

use tabweave_common::ConfigError;

/// Load config from the platform default path, creating it if missing.
pub fn load_config() -> Result<TabweaveConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Load config from an explicit override path, or the default path.
pub fn load_config_from(path: Option<&Path>) -> Result<TabweaveConfig, ConfigError> {
    match path {
        Some(path) => toml_loader::load_from_path(path),
        None => load_config(),
    }
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &TabweaveConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
