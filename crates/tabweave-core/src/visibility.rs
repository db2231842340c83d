//! Making hidden tabs measurable.
//!
//! A hidden surface is outside the layout tree and the engine collapses it.
//! To lay one out, the controller moves it to
//! [`VisualState::SuppressedForLayout`] (laid out, fully transparent, not
//! interactive), runs a full recompute, and hands back a [`LayoutGuard`]
//! that puts the recorded state back when it goes out of scope.

use tabweave_common::TabId;
use tracing::{debug, trace};

use crate::document::NodeId;
use crate::errors::LayoutError;
use crate::layout::{LayoutEngine, Size, VisualState};
use crate::tab::Tab;

#[derive(Debug, Default)]
pub struct VisibilityController {
    passes: u64,
    suppressions: u64,
}

impl VisibilityController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed layout passes.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Passes that needed a hidden tab to be suppressed first.
    pub fn suppressions(&self) -> u64 {
        self.suppressions
    }

    /// Lay out `tab` with its container in the layout tree.
    ///
    /// The recompute has finished by the time this returns. The tab's prior
    /// visual state is restored when the returned guard drops, or before
    /// the error is returned if the engine fails.
    pub fn with_layout_eligible<'t>(
        &mut self,
        tab: &'t mut Tab,
        engine: &mut dyn LayoutEngine,
    ) -> Result<LayoutGuard<'t>, LayoutError> {
        let prior = tab.visual_state();
        let suppressed = prior == VisualState::Hidden;
        if suppressed {
            tab.set_visual_state(VisualState::SuppressedForLayout);
            self.suppressions += 1;
            trace!(tab_id = %tab.id(), "suppressed for layout");
        }
        let guard = LayoutGuard {
            tab,
            prior,
            suppressed,
        };

        guard.tab.surface_mut().invalidate();
        engine.recompute(guard.tab.surface_mut())?;
        self.passes += 1;
        Ok(guard)
    }

    /// Full layout pass with nothing held afterwards.
    pub fn reconcile(&mut self, tab: &mut Tab, engine: &mut dyn LayoutEngine) -> Result<(), LayoutError> {
        let id = tab.id();
        self.with_layout_eligible(tab, engine).map(drop)?;
        debug!(tab_id = %id, "layout reconciled");
        Ok(())
    }
}

/// Holds a tab layout-eligible. Dropping it restores the visual state the
/// tab had before.
#[derive(Debug)]
pub struct LayoutGuard<'t> {
    tab: &'t mut Tab,
    prior: VisualState,
    suppressed: bool,
}

impl LayoutGuard<'_> {
    pub fn tab(&self) -> &Tab {
        self.tab
    }

    pub fn tab_id(&self) -> TabId {
        self.tab.id()
    }

    /// The state that will be restored.
    pub fn prior(&self) -> VisualState {
        self.prior
    }

    /// Whether the tab was hidden and had to be suppressed.
    pub fn suppressed(&self) -> bool {
        self.suppressed
    }

    pub fn measure(&self, engine: &dyn LayoutEngine, node: NodeId) -> Option<Size> {
        engine.measure(self.tab.surface(), node)
    }
}

impl Drop for LayoutGuard<'_> {
    fn drop(&mut self) {
        if self.tab.visual_state() != self.prior {
            self.tab.set_visual_state(self.prior);
            trace!(tab_id = %self.tab.id(), state = ?self.prior, "visual state restored");
        }
    }
}
