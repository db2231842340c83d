//! Configuration schema types.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod layout;
mod logging;
mod network;
mod runtime;
mod tabs;

pub use layout::*;
pub use logging::*;
pub use network::*;
pub use runtime::*;
pub use tabs::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TabweaveConfig {
    pub runtime: RuntimeConfig,
    pub network: NetworkConfig,
    pub tabs: TabsConfig,
    pub layout: LayoutConfig,
    pub logging: LoggingConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: TabweaveConfig = toml::from_str(
            r#"
[runtime]
tick_hz = 30
"#,
        )
        .unwrap();
        assert_eq!(config.runtime.tick_hz, 30);
        assert_eq!(config.network.fetch_timeout_ms, 15_000);
        assert_eq!(config.tabs.max_tabs, 64);
    }

    #[test]
    fn empty_toml_is_default() {
        let config: TabweaveConfig = toml::from_str("").unwrap();
        assert_eq!(config.runtime.tick_hz, 60);
        assert_eq!(config.logging.level, LogLevel::Info);
    }
}
