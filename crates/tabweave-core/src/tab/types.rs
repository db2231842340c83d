//! A single tab.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tabweave_common::TabId;
use url::Url;

use crate::document::DocumentTree;
use crate::errors::LoadError;
use crate::layout::{LayoutSurface, Size, VisualState};
use crate::listeners::ListenerSet;
use crate::load::Request;

use super::history::{History, NavigationIntent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadState {
    Idle,
    Loading,
    Rendering,
    Ready,
    Failed,
}

/// One tab: its document, how it is presented, and the script listeners
/// registered against that document.
///
/// Whether a tab is active is not stored here; ask the [`super::TabSet`].
#[derive(Debug)]
pub struct Tab {
    id: TabId,
    title: String,
    url: Option<Url>,
    load_state: LoadState,
    surface: LayoutSurface,
    pub(crate) listeners: ListenerSet,
    history: History,
    last_error: Option<LoadError>,
}

impl Tab {
    pub(crate) fn new(id: TabId, viewport: Size, history_limit: usize) -> Self {
        Self {
            id,
            title: String::from("New Tab"),
            url: None,
            load_state: LoadState::Idle,
            surface: LayoutSurface::new(viewport),
            listeners: ListenerSet::new(),
            history: History::new(history_limit),
            last_error: None,
        }
    }

    pub fn id(&self) -> TabId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    pub fn visual_state(&self) -> VisualState {
        self.surface.visual_state()
    }

    pub fn surface(&self) -> &LayoutSurface {
        &self.surface
    }

    pub fn document(&self) -> Arc<DocumentTree> {
        self.surface.document_snapshot()
    }

    pub fn listeners(&self) -> &ListenerSet {
        &self.listeners
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn last_error(&self) -> Option<&LoadError> {
        self.last_error.as_ref()
    }

    pub(crate) fn surface_mut(&mut self) -> &mut LayoutSurface {
        &mut self.surface
    }

    pub(crate) fn set_load_state(&mut self, state: LoadState) {
        self.load_state = state;
    }

    pub(crate) fn set_visual_state(&mut self, state: VisualState) {
        self.surface.set_visual_state(state);
    }

    /// Swap in a fully built document. Listeners belong to the old
    /// document and go with it.
    pub(crate) fn replace_document(&mut self, document: Arc<DocumentTree>) {
        if let Some(title) = document.title() {
            self.title = title.to_string();
        }
        self.surface.replace_document(document);
        self.listeners.clear();
    }

    /// Record a rendered navigation: the tab now shows `request`.
    pub(crate) fn commit_navigation(&mut self, request: &Request, intent: NavigationIntent) {
        if self.surface.document().title().is_none() {
            self.title = request.as_str().to_string();
        }
        self.url = Some(request.url().clone());
        self.history.commit(request.url(), intent);
        self.last_error = None;
        self.load_state = LoadState::Ready;
    }

    /// A load failed. The current document stays on screen.
    pub(crate) fn fail(&mut self, error: LoadError) {
        self.load_state = LoadState::Failed;
        self.last_error = Some(error);
    }
}
