//! Delivery of input and focus events to the active tab's listeners.

use tabweave_common::TabId;
use tracing::{debug, trace, warn};

use crate::listeners::{DispatchContext, EventKind, TabEvent, TabRequest};
use crate::tab::{ClosedTab, TabSet};

/// What one dispatch did to the tab set, and what it left for the caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchOutcome {
    /// Listener invocations that actually ran.
    pub delivered: usize,
    /// Propagation ended before every listener ran.
    pub stopped: bool,
    /// Tabs closed by listeners. Their listener sets are already gone.
    pub closed: Vec<ClosedTab>,
    /// Activations and navigations to run after dispatch has returned.
    pub deferred: Vec<TabRequest>,
}

impl DispatchOutcome {
    pub fn merge(&mut self, other: DispatchOutcome) {
        self.delivered += other.delivered;
        self.stopped |= other.stopped;
        self.closed.extend(other.closed);
        self.deferred.extend(other.deferred);
    }

    pub fn is_empty(&self) -> bool {
        self.delivered == 0 && self.closed.is_empty() && self.deferred.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct EventRouter {
    dispatched: u64,
    skipped: u64,
}

impl EventRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events routed so far.
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    /// Listener invocations dropped because their tab was no longer active.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Route an input event to whichever tab is active right now.
    pub fn dispatch(&mut self, tabs: &mut TabSet, event: TabEvent) -> DispatchOutcome {
        self.dispatched += 1;
        match tabs.active_id() {
            Some(target) => self.deliver(tabs, target, &event),
            None => {
                trace!(?event, "no active tab, event dropped");
                DispatchOutcome::default()
            }
        }
    }

    /// Invoke `target`'s listeners for `event`, one at a time. Before every
    /// invocation the tab is looked up again: once it is closed, loses the
    /// active slot, or stops being interactive, its remaining listeners are
    /// skipped.
    pub fn deliver(&mut self, tabs: &mut TabSet, target: TabId, event: &TabEvent) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();
        let kind = event.kind();
        let snapshot = match tabs.get(target) {
            Some(tab) => tab.listeners().ids_for(kind),
            None => return outcome,
        };

        for (i, listener_id) in snapshot.iter().copied().enumerate() {
            if !Self::accepts(tabs, target, kind) {
                let remaining = (snapshot.len() - i) as u64;
                self.skipped += remaining;
                debug!(tab_id = %target, remaining, "tab no longer active, stopping propagation");
                outcome.stopped = true;
                break;
            }
            let Some(listener) = tabs
                .get_mut(target)
                .and_then(|tab| tab.listeners.get_mut(listener_id))
            else {
                // removed by an earlier listener
                continue;
            };
            if listener.owner() != target || listener.kind() != kind {
                warn!(tab_id = %target, listener_id = %listener_id, "listener scope mismatch, skipped");
                continue;
            }

            let mut ctx = DispatchContext::new(target, listener_id);
            listener.invoke(event, &mut ctx);
            outcome.delivered += 1;

            if self.apply(tabs, target, ctx, &mut outcome) {
                outcome.stopped = true;
                break;
            }
        }
        outcome
    }

    fn accepts(tabs: &TabSet, target: TabId, kind: EventKind) -> bool {
        if tabs.active_id() != Some(target) {
            return false;
        }
        match tabs.get(target) {
            Some(tab) => kind.is_focus() || tab.visual_state().is_interactive(),
            None => false,
        }
    }

    /// Apply what a listener asked for. Returns `true` when propagation
    /// must stop.
    fn apply(
        &mut self,
        tabs: &mut TabSet,
        target: TabId,
        ctx: DispatchContext,
        outcome: &mut DispatchOutcome,
    ) -> bool {
        let (requests, mut stop) = ctx.into_parts();
        for request in requests {
            match request {
                TabRequest::Close(id) => {
                    if let Some(closed) = tabs.close(id) {
                        stop |= id == target;
                        outcome.closed.push(closed);
                    }
                }
                TabRequest::RemoveListener(listener) => {
                    tabs.unregister_listener(target, listener);
                }
                // The target stays active until dispatch returns, so its
                // remaining listeners still run.
                deferred @ (TabRequest::Activate(_) | TabRequest::Navigate { .. }) => {
                    outcome.deferred.push(deferred)
                }
            }
        }
        stop
    }
}
