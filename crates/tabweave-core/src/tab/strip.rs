//! Ordered tab strip with an optional active position.

use serde::{Deserialize, Serialize};
use tabweave_common::TabId;

/// Tab ids in display order. Unlike a pane stack the strip may be empty and
/// may have no active tab; pushing never activates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TabStrip {
    tabs: Vec<TabId>,
    active_index: Option<usize>,
}

impl TabStrip {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn contains(&self, id: TabId) -> bool {
        self.tabs.contains(&id)
    }

    pub fn ids(&self) -> &[TabId] {
        &self.tabs
    }

    pub fn position(&self, id: TabId) -> Option<usize> {
        self.tabs.iter().position(|&t| t == id)
    }

    pub fn get(&self, index: usize) -> Option<TabId> {
        self.tabs.get(index).copied()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active_index
    }

    pub fn active(&self) -> Option<TabId> {
        self.active_index.and_then(|i| self.get(i))
    }

    /// Append a tab at the end of the strip.
    pub fn push(&mut self, id: TabId) {
        self.tabs.push(id);
    }

    /// Remove a tab. Returns whether it was active and, if so, the previous
    /// neighbour (or the new first tab) that should take over. The strip is
    /// left without an active tab in that case.
    pub fn remove(&mut self, id: TabId) -> Option<(bool, Option<TabId>)> {
        let idx = self.position(id)?;
        self.tabs.remove(idx);
        match self.active_index {
            Some(active) if active == idx => {
                self.active_index = None;
                let successor = self.get(idx.saturating_sub(1));
                Some((true, successor))
            }
            Some(active) if idx < active => {
                self.active_index = Some(active - 1);
                Some((false, None))
            }
            _ => Some((false, None)),
        }
    }

    /// Set a specific tab as active. Returns `true` if found.
    pub fn set_active(&mut self, id: TabId) -> bool {
        match self.position(id) {
            Some(idx) => {
                self.active_index = Some(idx);
                true
            }
            None => false,
        }
    }

    /// The tab after the active one, wrapping around.
    pub fn next_id(&self) -> Option<TabId> {
        self.offset(1)
    }

    /// The tab before the active one, wrapping around.
    pub fn prev_id(&self) -> Option<TabId> {
        self.offset(self.tabs.len().saturating_sub(1))
    }

    fn offset(&self, by: usize) -> Option<TabId> {
        if self.tabs.is_empty() {
            return None;
        }
        let from = self.active_index.unwrap_or(0);
        self.get((from + by) % self.tabs.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip(n: u64) -> TabStrip {
        let mut strip = TabStrip::new();
        for i in 1..=n {
            strip.push(TabId(i));
        }
        strip
    }

    #[test]
    fn push_does_not_activate() {
        let strip = strip(2);
        assert_eq!(strip.len(), 2);
        assert_eq!(strip.active(), None);
    }

    #[test]
    fn removing_active_hands_over_to_previous() {
        let mut strip = strip(3);
        strip.set_active(TabId(3));
        assert_eq!(strip.remove(TabId(3)), Some((true, Some(TabId(2)))));
        assert_eq!(strip.active(), None);
    }

    #[test]
    fn removing_first_active_hands_over_to_new_first() {
        let mut strip = strip(3);
        strip.set_active(TabId(1));
        assert_eq!(strip.remove(TabId(1)), Some((true, Some(TabId(2)))));
    }

    #[test]
    fn removing_last_tab_leaves_no_successor() {
        let mut strip = strip(1);
        strip.set_active(TabId(1));
        assert_eq!(strip.remove(TabId(1)), Some((true, None)));
        assert!(strip.is_empty());
    }

    #[test]
    fn remove_earlier_tab_keeps_active() {
        let mut strip = strip(3);
        strip.set_active(TabId(3));
        assert_eq!(strip.remove(TabId(1)), Some((false, None)));
        assert_eq!(strip.active(), Some(TabId(3)));
        assert_eq!(strip.active_index(), Some(1));
    }

    #[test]
    fn remove_nonexistent_is_none() {
        let mut strip = strip(1);
        assert_eq!(strip.remove(TabId(9)), None);
    }

    #[test]
    fn next_and_prev_wrap() {
        let mut strip = strip(3);
        strip.set_active(TabId(3));
        assert_eq!(strip.next_id(), Some(TabId(1)));
        assert_eq!(strip.prev_id(), Some(TabId(2)));
        strip.set_active(TabId(1));
        assert_eq!(strip.prev_id(), Some(TabId(3)));
    }

    #[test]
    fn single_tab_cycles_to_itself() {
        let mut strip = strip(1);
        strip.set_active(TabId(1));
        assert_eq!(strip.next_id(), Some(TabId(1)));
        assert_eq!(strip.prev_id(), Some(TabId(1)));
        assert_eq!(TabStrip::new().next_id(), None);
    }

    #[test]
    fn serialization_roundtrip() {
        let mut strip = strip(3);
        strip.set_active(TabId(2));
        let json = serde_json::to_string(&strip).unwrap();
        let back: TabStrip = serde_json::from_str(&json).unwrap();
        assert_eq!(back.active(), Some(TabId(2)));
        assert_eq!(back.ids(), strip.ids());
    }
}
