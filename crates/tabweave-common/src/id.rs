//! Opaque identifiers for tabs, load jobs, and listener registrations.
//!
//! Ids are handed out by an [`IdAllocator`] and are never reused for the
//! lifetime of the allocator, so a stale id captured by a worker can always
//! be detected by a failed lookup.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TabId(pub u64);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tab-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ListenerId(pub u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

/// Monotonic counter. Starts at 1 so that 0 never names a live object.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_raw(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    pub fn next_tab(&mut self) -> TabId {
        TabId(self.next_raw())
    }

    pub fn next_job(&mut self) -> JobId {
        JobId(self.next_raw())
    }

    pub fn next_listener(&mut self) -> ListenerId {
        ListenerId(self.next_raw())
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocator_starts_at_one() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.next_tab(), TabId(1));
    }

    #[test]
    fn allocator_never_repeats() {
        let mut ids = IdAllocator::new();
        let a = ids.next_tab();
        let b = ids.next_tab();
        let c = ids.next_job();
        assert_ne!(a, b);
        assert_eq!(c, JobId(3));
    }

    #[test]
    fn display_prefixes() {
        assert_eq!(TabId(4).to_string(), "tab-4");
        assert_eq!(JobId(9).to_string(), "job-9");
        assert_eq!(ListenerId(2).to_string(), "listener-2");
    }

    #[test]
    fn tab_id_serialization() {
        let id = TabId(42);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "42");
        let back: TabId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn tab_id_hash() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(TabId(1));
        set.insert(TabId(1));
        set.insert(TabId(2));
        assert_eq!(set.len(), 2);
    }
}
