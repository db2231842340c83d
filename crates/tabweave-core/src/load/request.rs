use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use url::Url;

use crate::errors::FetchError;

/// A navigation target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    url: Url,
}

impl Request {
    pub fn parse(input: &str) -> Result<Self, FetchError> {
        Url::parse(input.trim())
            .map(Self::from_url)
            .map_err(|e| FetchError::InvalidUrl(format!("{input}: {e}")))
    }

    pub fn from_url(url: Url) -> Self {
        Self { url }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

/// Shared cancellation bit between a job and its worker. Transports are
/// expected to check it between blocking steps.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
