//! The tab set: every open tab plus the single source of truth for which
//! one is active.

use std::collections::HashMap;

use tabweave_common::{IdAllocator, ListenerId, TabId, TabweaveError};
use tracing::{debug, info};

use crate::layout::{Size, VisualState};
use crate::listeners::{DispatchContext, EventKind, ScopedListener, TabEvent};

use super::strip::TabStrip;
use super::types::Tab;

/// What closing a tab left behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClosedTab {
    pub id: TabId,
    pub was_active: bool,
    /// The tab that should become active, when the closed one was active.
    pub successor: Option<TabId>,
}

pub struct TabSet {
    tabs: HashMap<TabId, Tab>,
    strip: TabStrip,
    ids: IdAllocator,
    viewport: Size,
    max_tabs: usize,
    history_limit: usize,
}

impl TabSet {
    pub fn new(max_tabs: usize, history_limit: usize, viewport: Size) -> Self {
        Self {
            tabs: HashMap::new(),
            strip: TabStrip::new(),
            ids: IdAllocator::new(),
            viewport,
            max_tabs: max_tabs.max(1),
            history_limit,
        }
    }

    // -- Accessors --

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn max_tabs(&self) -> usize {
        self.max_tabs
    }

    pub fn contains(&self, id: TabId) -> bool {
        self.tabs.contains_key(&id)
    }

    pub fn get(&self, id: TabId) -> Option<&Tab> {
        self.tabs.get(&id)
    }

    pub fn get_mut(&mut self, id: TabId) -> Option<&mut Tab> {
        self.tabs.get_mut(&id)
    }

    /// The active tab, read from the strip every time.
    pub fn active_id(&self) -> Option<TabId> {
        self.strip.active()
    }

    pub fn is_active(&self, id: TabId) -> bool {
        self.active_id() == Some(id)
    }

    pub fn active(&self) -> Option<&Tab> {
        self.active_id().and_then(|id| self.tabs.get(&id))
    }

    /// Tab ids in strip order.
    pub fn ids(&self) -> &[TabId] {
        self.strip.ids()
    }

    pub fn position(&self, id: TabId) -> Option<usize> {
        self.strip.position(id)
    }

    pub fn id_at(&self, position: usize) -> Option<TabId> {
        self.strip.get(position)
    }

    pub fn next_id(&self) -> Option<TabId> {
        self.strip.next_id()
    }

    pub fn prev_id(&self) -> Option<TabId> {
        self.strip.prev_id()
    }

    pub fn strip(&self) -> &TabStrip {
        &self.strip
    }

    /// Tabs in strip order.
    pub fn iter(&self) -> impl Iterator<Item = &Tab> + '_ {
        self.strip.ids().iter().filter_map(|id| self.tabs.get(id))
    }

    // -- Lifecycle --

    /// Open a hidden, inactive tab at the end of the strip.
    pub fn open(&mut self) -> Result<TabId, TabweaveError> {
        if self.tabs.len() >= self.max_tabs {
            return Err(TabweaveError::TabLimit(self.max_tabs));
        }
        let id = self.ids.next_tab();
        self.tabs
            .insert(id, Tab::new(id, self.viewport, self.history_limit));
        self.strip.push(id);
        info!(tab_id = %id, "tab opened");
        Ok(id)
    }

    /// Close a tab. Its document and listener set are dropped here, in the
    /// same step that removes it from the strip.
    pub fn close(&mut self, id: TabId) -> Option<ClosedTab> {
        let (was_active, successor) = self.strip.remove(id)?;
        let tab = self.tabs.remove(&id);
        let listeners = tab.as_ref().map_or(0, |t| t.listeners.len());
        drop(tab);
        info!(tab_id = %id, was_active, listeners, "tab closed");
        Some(ClosedTab {
            id,
            was_active,
            successor,
        })
    }

    /// Move the active index. The previous tab is hidden and the new one
    /// made visible; focus notifications are the caller's business.
    pub(crate) fn set_active(&mut self, id: TabId) -> bool {
        if !self.tabs.contains_key(&id) {
            return false;
        }
        if let Some(prev) = self.active_id() {
            if prev != id {
                if let Some(tab) = self.tabs.get_mut(&prev) {
                    tab.set_visual_state(VisualState::Hidden);
                }
            }
        }
        if !self.strip.set_active(id) {
            return false;
        }
        if let Some(tab) = self.tabs.get_mut(&id) {
            tab.set_visual_state(VisualState::Visible);
        }
        debug!(tab_id = %id, "active tab changed");
        true
    }

    // -- Script listeners --

    /// Register a listener owned by `tab`. It is tagged with the tab id
    /// and only ever invoked while that tab is active.
    pub fn register_listener<F>(
        &mut self,
        tab: TabId,
        kind: EventKind,
        handler: F,
    ) -> Result<ListenerId, TabweaveError>
    where
        F: FnMut(&TabEvent, &mut DispatchContext) + 'static,
    {
        let owner = self
            .tabs
            .get_mut(&tab)
            .ok_or(TabweaveError::UnknownTab(tab))?;
        let id = self.ids.next_listener();
        owner
            .listeners
            .insert(ScopedListener::new(id, tab, kind, Box::new(handler)));
        debug!(tab_id = %tab, listener_id = %id, ?kind, "listener registered");
        Ok(id)
    }

    pub fn unregister_listener(&mut self, tab: TabId, listener: ListenerId) -> bool {
        self.tabs
            .get_mut(&tab)
            .is_some_and(|t| t.listeners.remove(listener))
    }
}
