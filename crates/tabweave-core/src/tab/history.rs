//! Per-tab back/forward history.

use serde::{Deserialize, Serialize};
use url::Url;

/// Why a load was started; decides how history moves once it renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationIntent {
    Push,
    Reload,
    Back,
    Forward,
}

/// Committed navigations of one tab. Entries are only added once a load
/// has rendered, so failed or cancelled loads never show up here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct History {
    entries: Vec<Url>,
    index: Option<usize>,
    limit: usize,
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            index: None,
            limit: limit.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Url] {
        &self.entries
    }

    pub fn current(&self) -> Option<&Url> {
        self.index.and_then(|i| self.entries.get(i))
    }

    pub fn back_target(&self) -> Option<&Url> {
        let i = self.index?;
        self.entries.get(i.checked_sub(1)?)
    }

    pub fn forward_target(&self) -> Option<&Url> {
        self.entries.get(self.index? + 1)
    }

    pub fn can_go_back(&self) -> bool {
        self.back_target().is_some()
    }

    pub fn can_go_forward(&self) -> bool {
        self.forward_target().is_some()
    }

    /// Record a rendered navigation.
    pub fn commit(&mut self, url: &Url, intent: NavigationIntent) {
        match intent {
            NavigationIntent::Back if self.back_target() == Some(url) => {
                self.index = self.index.map(|i| i - 1);
            }
            NavigationIntent::Forward if self.forward_target() == Some(url) => {
                self.index = self.index.map(|i| i + 1);
            }
            NavigationIntent::Reload if self.current() == Some(url) => {}
            _ => self.push(url.clone()),
        }
    }

    fn push(&mut self, url: Url) {
        let keep = self.index.map_or(0, |i| i + 1);
        self.entries.truncate(keep);
        self.entries.push(url);
        if self.entries.len() > self.limit {
            let excess = self.entries.len() - self.limit;
            self.entries.drain(..excess);
        }
        self.index = Some(self.entries.len() - 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn push_then_back_and_forward() {
        let mut h = History::new(10);
        h.commit(&url("gemini://a/"), NavigationIntent::Push);
        h.commit(&url("gemini://b/"), NavigationIntent::Push);
        assert_eq!(h.back_target(), Some(&url("gemini://a/")));
        assert!(!h.can_go_forward());

        h.commit(&url("gemini://a/"), NavigationIntent::Back);
        assert_eq!(h.current(), Some(&url("gemini://a/")));
        assert_eq!(h.forward_target(), Some(&url("gemini://b/")));
        assert_eq!(h.len(), 2);

        h.commit(&url("gemini://b/"), NavigationIntent::Forward);
        assert_eq!(h.current(), Some(&url("gemini://b/")));
    }

    #[test]
    fn push_after_back_truncates_forward_entries() {
        let mut h = History::new(10);
        for s in ["gemini://a/", "gemini://b/", "gemini://c/"] {
            h.commit(&url(s), NavigationIntent::Push);
        }
        h.commit(&url("gemini://b/"), NavigationIntent::Back);
        h.commit(&url("gemini://d/"), NavigationIntent::Push);
        let entries: Vec<&str> = h.entries().iter().map(Url::as_str).collect();
        assert_eq!(entries, vec!["gemini://a/", "gemini://b/", "gemini://d/"]);
        assert!(!h.can_go_forward());
    }

    #[test]
    fn reload_does_not_add_entry() {
        let mut h = History::new(10);
        h.commit(&url("gemini://a/"), NavigationIntent::Push);
        h.commit(&url("gemini://a/"), NavigationIntent::Reload);
        assert_eq!(h.len(), 1);
    }

    #[test]
    fn stale_back_target_falls_back_to_push() {
        let mut h = History::new(10);
        h.commit(&url("gemini://a/"), NavigationIntent::Push);
        h.commit(&url("gemini://z/"), NavigationIntent::Back);
        assert_eq!(h.len(), 2);
        assert_eq!(h.current(), Some(&url("gemini://z/")));
    }

    #[test]
    fn limit_drops_oldest() {
        let mut h = History::new(2);
        for s in ["gemini://a/", "gemini://b/", "gemini://c/"] {
            h.commit(&url(s), NavigationIntent::Push);
        }
        assert_eq!(h.len(), 2);
        assert_eq!(h.entries()[0], url("gemini://b/"));
        assert_eq!(h.current(), Some(&url("gemini://c/")));
    }
}
