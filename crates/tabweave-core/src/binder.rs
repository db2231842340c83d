//! Writing parsed documents into the tab that asked for them.

use std::sync::Arc;

use tabweave_common::TabId;
use tracing::{debug, warn};

use crate::document::DocumentTree;
use crate::errors::LayoutError;
use crate::layout::LayoutEngine;
use crate::tab::{LoadState, TabSet};
use crate::visibility::VisibilityController;

#[derive(Debug, Clone, PartialEq)]
pub enum BindOutcome {
    Rendered(TabId),
    /// The document was swapped in but the engine failed to lay it out.
    RenderedWithoutLayout(TabId, LayoutError),
    /// The origin tab is gone; the document was dropped.
    StaleTarget(TabId),
}

impl BindOutcome {
    pub fn tab(&self) -> TabId {
        match self {
            BindOutcome::Rendered(tab)
            | BindOutcome::RenderedWithoutLayout(tab, _)
            | BindOutcome::StaleTarget(tab) => *tab,
        }
    }

    pub fn is_rendered(&self) -> bool {
        !matches!(self, BindOutcome::StaleTarget(_))
    }
}

#[derive(Debug, Default)]
pub struct RenderTargetBinder {
    rendered: u64,
    stale: u64,
}

impl RenderTargetBinder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rendered(&self) -> u64 {
        self.rendered
    }

    pub fn stale(&self) -> u64 {
        self.stale
    }

    /// Install `document` in `origin` and lay it out.
    ///
    /// The target is the tab the load was started for. Which tab is active
    /// has no bearing on where the document goes.
    pub fn bind_and_render(
        &mut self,
        tabs: &mut TabSet,
        origin: TabId,
        document: DocumentTree,
        visibility: &mut VisibilityController,
        engine: &mut dyn LayoutEngine,
    ) -> BindOutcome {
        let Some(tab) = tabs.get_mut(origin) else {
            self.stale += 1;
            debug!(tab_id = %origin, "origin tab gone, document discarded");
            return BindOutcome::StaleTarget(origin);
        };

        tab.set_load_state(LoadState::Rendering);
        tab.replace_document(Arc::new(document));
        let outcome = match visibility.with_layout_eligible(tab, engine) {
            Ok(_guard) => BindOutcome::Rendered(origin),
            Err(err) => {
                warn!(tab_id = %origin, error = %err, "layout failed after render");
                BindOutcome::RenderedWithoutLayout(origin, err)
            }
        };
        tab.set_load_state(LoadState::Ready);
        self.rendered += 1;
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{NodeId, NodeKind};
    use crate::layout::{FlowLayout, Size, VisualState};

    fn doc(text: &str) -> DocumentTree {
        let mut doc = DocumentTree::new();
        doc.push(
            NodeId::ROOT,
            NodeKind::Heading {
                level: 1,
                text: text.into(),
            },
        );
        doc
    }

    #[test]
    fn renders_into_hidden_origin_not_active_tab() {
        let mut tabs = TabSet::new(4, 10, Size::new(200.0, 100.0));
        let a = tabs.open().unwrap();
        let b = tabs.open().unwrap();
        tabs.set_active(b);
        let mut binder = RenderTargetBinder::new();
        let mut visibility = VisibilityController::new();
        let mut engine = FlowLayout::new(10.0, 20.0);

        let outcome = binder.bind_and_render(&mut tabs, a, doc("Alpha"), &mut visibility, &mut engine);

        assert_eq!(outcome, BindOutcome::Rendered(a));
        let tab_a = tabs.get(a).unwrap();
        assert_eq!(tab_a.title(), "Alpha");
        assert_eq!(tab_a.visual_state(), VisualState::Hidden);
        assert!(tab_a.surface().geometry().is_measured());
        assert_ne!(
            engine.measure(tab_a.surface(), NodeId(1)),
            Some(Size::ZERO)
        );
        assert!(tabs.get(b).unwrap().document().is_empty());
    }

    #[test]
    fn missing_origin_is_stale() {
        let mut tabs = TabSet::new(4, 10, Size::new(200.0, 100.0));
        let a = tabs.open().unwrap();
        tabs.close(a);
        let mut binder = RenderTargetBinder::new();

        let outcome = binder.bind_and_render(
            &mut tabs,
            a,
            doc("Gone"),
            &mut VisibilityController::new(),
            &mut FlowLayout::new(10.0, 20.0),
        );

        assert_eq!(outcome, BindOutcome::StaleTarget(a));
        assert!(tabs.is_empty());
        assert_eq!(binder.stale(), 1);
    }

    #[test]
    fn snapshot_holders_keep_old_document() {
        let mut tabs = TabSet::new(4, 10, Size::new(200.0, 100.0));
        let a = tabs.open().unwrap();
        let mut binder = RenderTargetBinder::new();
        let mut visibility = VisibilityController::new();
        let mut engine = FlowLayout::new(10.0, 20.0);

        binder.bind_and_render(&mut tabs, a, doc("One"), &mut visibility, &mut engine);
        let before = tabs.get(a).unwrap().document();
        binder.bind_and_render(&mut tabs, a, doc("Two"), &mut visibility, &mut engine);

        assert_eq!(before.title(), Some("One"));
        assert_eq!(tabs.get(a).unwrap().document().title(), Some("Two"));
    }

    #[test]
    fn render_drops_listeners_of_old_document() {
        let mut tabs = TabSet::new(4, 10, Size::new(200.0, 100.0));
        let a = tabs.open().unwrap();
        tabs.register_listener(a, crate::listeners::EventKind::Key, |_, _| {})
            .unwrap();
        RenderTargetBinder::new().bind_and_render(
            &mut tabs,
            a,
            doc("New"),
            &mut VisibilityController::new(),
            &mut FlowLayout::new(10.0, 20.0),
        );
        assert!(tabs.get(a).unwrap().listeners().is_empty());
    }
}
