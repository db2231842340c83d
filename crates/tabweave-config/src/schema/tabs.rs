use serde::{Deserialize, Serialize};

/// Tab strip limits and defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TabsConfig {
    /// Maximum number of open tabs (valid range: 1-512).
    pub max_tabs: u32,
    /// URL loaded into a new tab when none is given.
    pub home_url: String,
    /// Back/forward entries kept per tab (valid range: 1-1000).
    pub history_limit: u32,
}

impl Default for TabsConfig {
    fn default() -> Self {
        Self {
            max_tabs: 64,
            home_url: "about:blank".into(),
            history_limit: 100,
        }
    }
}
