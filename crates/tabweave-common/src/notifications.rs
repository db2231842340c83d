use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::id::TabId;

/// Severity level for user-facing notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

/// A user-facing notification, optionally attributed to a tab.
#[derive(Debug, Clone)]
pub struct Notification {
    pub level: NotificationLevel,
    pub tab: Option<TabId>,
    pub title: String,
    pub body: String,
    pub created_at: Instant,
    pub ttl: Duration,
}

impl Notification {
    pub fn info(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self::with_level(NotificationLevel::Info, title, body, Duration::from_secs(5))
    }

    pub fn warning(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self::with_level(NotificationLevel::Warning, title, body, Duration::from_secs(8))
    }

    pub fn error(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self::with_level(NotificationLevel::Error, title, body, Duration::from_secs(10))
    }

    /// An error notification for a failed page load in `tab`.
    pub fn load_failed(tab: TabId, url: &str, error: &str) -> Self {
        let mut n = Self::error(format!("Could not load {url}"), error.to_string());
        n.tab = Some(tab);
        n
    }

    fn with_level(
        level: NotificationLevel,
        title: impl Into<String>,
        body: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        Self {
            level,
            tab: None,
            title: title.into(),
            body: body.into(),
            created_at: Instant::now(),
            ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.ttl
    }
}

/// Bounded queue of notifications that evicts expired entries on access.
#[derive(Debug)]
pub struct NotificationQueue {
    items: VecDeque<Notification>,
    capacity: usize,
}

impl NotificationQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a notification. When still full after evicting expired entries
    /// the oldest one is dropped.
    pub fn push(&mut self, notification: Notification) {
        self.evict_expired();
        if self.items.len() >= self.capacity {
            self.items.pop_front();
        }
        self.items.push_back(notification);
    }

    pub fn visible(&mut self) -> Vec<&Notification> {
        self.evict_expired();
        self.items.iter().collect()
    }

    /// Drop every notification attributed to `tab` (the tab was closed).
    pub fn dismiss_tab(&mut self, tab: TabId) {
        self.items.retain(|n| n.tab != Some(tab));
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn evict_expired(&mut self) {
        self.items.retain(|n| !n.is_expired());
    }
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new(16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_failed_is_attributed_error() {
        let n = Notification::load_failed(TabId(2), "gemini://x/", "timed out");
        assert_eq!(n.level, NotificationLevel::Error);
        assert_eq!(n.tab, Some(TabId(2)));
        assert!(n.title.contains("gemini://x/"));
        assert_eq!(n.body, "timed out");
    }

    #[test]
    fn queue_drops_oldest_when_full() {
        let mut q = NotificationQueue::new(2);
        q.push(Notification::info("a", ""));
        q.push(Notification::info("b", ""));
        q.push(Notification::info("c", ""));
        let titles: Vec<_> = q.visible().iter().map(|n| n.title.clone()).collect();
        assert_eq!(titles, vec!["b", "c"]);
    }

    #[test]
    fn expired_entries_are_evicted() {
        let mut q = NotificationQueue::new(4);
        let mut stale = Notification::info("old", "");
        stale.ttl = Duration::ZERO;
        q.push(stale);
        q.push(Notification::warning("fresh", ""));
        assert_eq!(q.visible().len(), 1);
    }

    #[test]
    fn dismiss_tab_removes_only_that_tab() {
        let mut q = NotificationQueue::default();
        q.push(Notification::load_failed(TabId(1), "a", "e"));
        q.push(Notification::load_failed(TabId(2), "b", "e"));
        q.push(Notification::info("global", ""));
        q.dismiss_tab(TabId(1));
        assert_eq!(q.len(), 2);
        assert!(q.visible().iter().all(|n| n.tab != Some(TabId(1))));
    }
}
