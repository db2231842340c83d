//! Active-tab changes and the focus notifications that go with them.

use serde::{Deserialize, Serialize};
use tabweave_common::{TabId, TabweaveError};
use tracing::{debug, warn};

use crate::layout::LayoutEngine;
use crate::listeners::TabEvent;
use crate::router::{DispatchOutcome, EventRouter};
use crate::tab::TabSet;
use crate::visibility::VisibilityController;

/// One change of the active tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusTransition {
    pub from: Option<TabId>,
    pub to: TabId,
}

#[derive(Debug, Default, PartialEq)]
pub struct FocusOutcome {
    /// `None` when nothing changed.
    pub transition: Option<FocusTransition>,
    /// Everything the focus listeners asked for.
    pub dispatch: DispatchOutcome,
}

#[derive(Debug, Default)]
pub struct FocusCoordinator {
    pending_reconcile: Option<TabId>,
}

impl FocusCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending_reconcile(&self) -> Option<TabId> {
        self.pending_reconcile
    }

    /// Make `to` the active tab.
    ///
    /// The outgoing tab hears `FocusLost` while it still owns the active
    /// slot, then the index moves, then the incoming tab hears
    /// `FocusGained`. A layout reconcile of `to` is queued for the next
    /// tick. Switching to the tab that is already active does nothing.
    pub fn switch_to(
        &mut self,
        tabs: &mut TabSet,
        router: &mut EventRouter,
        to: TabId,
    ) -> Result<FocusOutcome, TabweaveError> {
        if !tabs.contains(to) {
            return Err(TabweaveError::UnknownTab(to));
        }
        let from = tabs.active_id();
        if from == Some(to) {
            return Ok(FocusOutcome::default());
        }

        let mut dispatch = DispatchOutcome::default();
        if let Some(prev) = from {
            dispatch.merge(router.deliver(tabs, prev, &TabEvent::FocusLost { to: Some(to) }));
        }
        if !tabs.contains(to) {
            debug!(tab_id = %to, "switch target closed by focus-lost listener");
            return Ok(FocusOutcome {
                transition: None,
                dispatch,
            });
        }

        tabs.set_active(to);
        dispatch.merge(router.deliver(tabs, to, &TabEvent::FocusGained { from }));
        self.pending_reconcile = Some(to);

        let transition = FocusTransition { from, to };
        debug!(from = ?from, to = %to, "focus moved");
        Ok(FocusOutcome {
            transition: Some(transition),
            dispatch,
        })
    }

    /// Run the queued reconcile if its tab is still the active one.
    /// Returns the tab that was reconciled.
    pub fn run_deferred(
        &mut self,
        tabs: &mut TabSet,
        visibility: &mut VisibilityController,
        engine: &mut dyn LayoutEngine,
    ) -> Option<TabId> {
        let id = self.pending_reconcile.take()?;
        if tabs.active_id() != Some(id) {
            debug!(tab_id = %id, "reconcile target no longer active");
            return None;
        }
        let tab = tabs.get_mut(id)?;
        if let Err(err) = visibility.reconcile(tab, engine) {
            warn!(tab_id = %id, error = %err, "focus reconcile failed");
        }
        Some(id)
    }

    /// Drop queued work for a tab that is going away.
    pub fn forget(&mut self, tab: TabId) {
        if self.pending_reconcile == Some(tab) {
            self.pending_reconcile = None;
        }
    }
}
