use std::time::Duration;

use serde::{Deserialize, Serialize};

/// UI loop pacing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Ticks per second of the UI loop (valid range: 1-240).
    pub tick_hz: u32,
}

impl RuntimeConfig {
    /// Time between two ticks.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.tick_hz.max(1)))
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self { tick_hz: 60 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sixty_hz_is_about_sixteen_ms() {
        let interval = RuntimeConfig::default().tick_interval();
        assert_eq!(interval.as_millis(), 16);
    }

    #[test]
    fn zero_hz_does_not_divide_by_zero() {
        let config = RuntimeConfig { tick_hz: 0 };
        assert_eq!(config.tick_interval(), Duration::from_secs(1));
    }
}
