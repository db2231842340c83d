//! Failure taxonomy for loads.
//!
//! Only fetch and parse failures are errors. A completion for a closed tab
//! or a superseded job is an expected race and is reported as an outcome
//! (`BindOutcome::StaleTarget`, `PollReport::discarded`) instead.

use std::time::Duration;

use tabweave_common::TabId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("unsupported scheme `{0}`")]
    UnsupportedScheme(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("fetch timed out after {0:?}")]
    TimedOut(Duration),

    #[error("fetch cancelled")]
    Cancelled,

    #[error("fetch worker exited without a result")]
    WorkerLost,

    #[error("failed to spawn fetch worker: {0}")]
    Spawn(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("malformed document: {0}")]
    Malformed(String),

    #[error("payload is not valid UTF-8 at byte {0}")]
    Encoding(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("layout engine failed: {0}")]
    Engine(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("unknown tab: {0}")]
    UnknownTab(TabId),
}
