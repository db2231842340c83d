use std::path::PathBuf;

use crate::id::TabId;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum TabweaveError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("unknown tab: {0}")]
    UnknownTab(TabId),

    #[error("tab limit reached ({0} open)")]
    TabLimit(usize),

    #[error("load error: {0}")]
    Load(String),

    #[error("script error: {0}")]
    Script(String),

    #[error("{0}")]
    Other(String),
}
