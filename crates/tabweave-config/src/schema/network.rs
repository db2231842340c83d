use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Fetch worker settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// A pending fetch older than this fails the load (valid range: 100-300000).
    pub fetch_timeout_ms: u64,
    /// URL schemes a navigation may use.
    pub allowed_schemes: Vec<String>,
    pub user_agent: String,
}

impl NetworkConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_ms: 15_000,
            allowed_schemes: vec!["gemini".into(), "file".into(), "about".into()],
            user_agent: format!("tabweave/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}
