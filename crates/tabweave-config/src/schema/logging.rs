use serde::{Deserialize, Serialize};

/// Log level.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// `tracing-subscriber` directive for the workspace crates at this level.
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Trace => "tabweave=trace",
            LogLevel::Debug => "tabweave=debug",
            LogLevel::Info => "tabweave=info",
            LogLevel::Warn => "tabweave=warn",
            LogLevel::Error => "tabweave=error",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}
