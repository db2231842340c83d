//! Script listeners scoped to the tab that registered them.

use std::fmt;

use serde::{Deserialize, Serialize};
use tabweave_common::{ListenerId, TabId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Pointer,
    Key,
    FocusLost,
    FocusGained,
}

impl EventKind {
    pub fn is_focus(self) -> bool {
        matches!(self, EventKind::FocusLost | EventKind::FocusGained)
    }
}

/// An event as a listener sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TabEvent {
    Pointer { x: f64, y: f64 },
    Key { key: String },
    FocusLost { to: Option<TabId> },
    FocusGained { from: Option<TabId> },
}

impl TabEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            TabEvent::Pointer { .. } => EventKind::Pointer,
            TabEvent::Key { .. } => EventKind::Key,
            TabEvent::FocusLost { .. } => EventKind::FocusLost,
            TabEvent::FocusGained { .. } => EventKind::FocusGained,
        }
    }
}

/// Something a listener asked for while it ran. Applied by the router
/// once the handler has returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabRequest {
    Close(TabId),
    Activate(TabId),
    Navigate { tab: TabId, url: String },
    RemoveListener(ListenerId),
}

/// Handed to a listener for the duration of one invocation.
#[derive(Debug)]
pub struct DispatchContext {
    tab: TabId,
    listener: ListenerId,
    requests: Vec<TabRequest>,
    stopped: bool,
}

impl DispatchContext {
    pub(crate) fn new(tab: TabId, listener: ListenerId) -> Self {
        Self {
            tab,
            listener,
            requests: Vec::new(),
            stopped: false,
        }
    }

    /// The tab the running listener belongs to.
    pub fn tab(&self) -> TabId {
        self.tab
    }

    pub fn listener(&self) -> ListenerId {
        self.listener
    }

    pub fn close_tab(&mut self, tab: TabId) {
        self.requests.push(TabRequest::Close(tab));
    }

    pub fn close_self(&mut self) {
        self.close_tab(self.tab);
    }

    pub fn activate(&mut self, tab: TabId) {
        self.requests.push(TabRequest::Activate(tab));
    }

    /// Navigate the listener's own tab.
    pub fn navigate(&mut self, url: impl Into<String>) {
        self.requests.push(TabRequest::Navigate {
            tab: self.tab,
            url: url.into(),
        });
    }

    pub fn remove_self(&mut self) {
        self.requests.push(TabRequest::RemoveListener(self.listener));
    }

    pub fn stop_propagation(&mut self) {
        self.stopped = true;
    }

    pub(crate) fn into_parts(self) -> (Vec<TabRequest>, bool) {
        (self.requests, self.stopped)
    }
}

pub type Handler = Box<dyn FnMut(&TabEvent, &mut DispatchContext)>;

/// A listener and the tab it was registered against.
pub struct ScopedListener {
    id: ListenerId,
    owner: TabId,
    kind: EventKind,
    handler: Handler,
}

impl ScopedListener {
    pub fn new(id: ListenerId, owner: TabId, kind: EventKind, handler: Handler) -> Self {
        Self {
            id,
            owner,
            kind,
            handler,
        }
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }

    pub fn owner(&self) -> TabId {
        self.owner
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub(crate) fn invoke(&mut self, event: &TabEvent, ctx: &mut DispatchContext) {
        (self.handler)(event, ctx);
    }
}

impl fmt::Debug for ScopedListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedListener")
            .field("id", &self.id)
            .field("owner", &self.owner)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Listeners of one tab, in registration order.
#[derive(Debug, Default)]
pub struct ListenerSet {
    listeners: Vec<ScopedListener>,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn insert(&mut self, listener: ScopedListener) {
        self.listeners.push(listener);
    }

    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        self.listeners.len() != before
    }

    pub fn get_mut(&mut self, id: ListenerId) -> Option<&mut ScopedListener> {
        self.listeners.iter_mut().find(|l| l.id == id)
    }

    /// Ids of listeners for `kind`, in registration order.
    pub fn ids_for(&self, kind: EventKind) -> Vec<ListenerId> {
        self.listeners
            .iter()
            .filter(|l| l.kind == kind)
            .map(|l| l.id)
            .collect()
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.listeners.iter().filter(|l| l.kind == kind).count()
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(id: u64, kind: EventKind) -> ScopedListener {
        ScopedListener::new(ListenerId(id), TabId(1), kind, Box::new(|_, _| {}))
    }

    #[test]
    fn event_kinds() {
        assert_eq!(TabEvent::Key { key: "a".into() }.kind(), EventKind::Key);
        assert_eq!(TabEvent::Pointer { x: 0.0, y: 0.0 }.kind(), EventKind::Pointer);
        assert!(TabEvent::FocusLost { to: None }.kind().is_focus());
        assert!(!EventKind::Key.is_focus());
    }

    #[test]
    fn ids_for_filters_by_kind_in_order() {
        let mut set = ListenerSet::new();
        set.insert(noop(1, EventKind::Key));
        set.insert(noop(2, EventKind::Pointer));
        set.insert(noop(3, EventKind::Key));
        assert_eq!(set.ids_for(EventKind::Key), vec![ListenerId(1), ListenerId(3)]);
        assert_eq!(set.count(EventKind::Pointer), 1);
    }

    #[test]
    fn remove_reports_presence() {
        let mut set = ListenerSet::new();
        set.insert(noop(1, EventKind::Key));
        assert!(set.remove(ListenerId(1)));
        assert!(!set.remove(ListenerId(1)));
        assert!(set.is_empty());
    }

    #[test]
    fn context_collects_requests() {
        let mut ctx = DispatchContext::new(TabId(4), ListenerId(9));
        ctx.close_self();
        ctx.navigate("gemini://x/");
        ctx.remove_self();
        ctx.stop_propagation();
        let (requests, stopped) = ctx.into_parts();
        assert!(stopped);
        assert_eq!(
            requests,
            vec![
                TabRequest::Close(TabId(4)),
                TabRequest::Navigate {
                    tab: TabId(4),
                    url: "gemini://x/".into()
                },
                TabRequest::RemoveListener(ListenerId(9)),
            ]
        );
    }

    #[test]
    fn invoke_runs_handler() {
        let mut listener = ScopedListener::new(
            ListenerId(1),
            TabId(1),
            EventKind::Key,
            Box::new(|event, ctx| {
                if let TabEvent::Key { key } = event {
                    ctx.navigate(format!("gemini://{key}/"));
                }
            }),
        );
        let mut ctx = DispatchContext::new(TabId(1), ListenerId(1));
        listener.invoke(&TabEvent::Key { key: "k".into() }, &mut ctx);
        assert_eq!(ctx.into_parts().0.len(), 1);
    }
}
