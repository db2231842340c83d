//! The browser facade: one tab set, the six coordinators around it, and
//! the per-tick driver.

mod commands;

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tabweave_common::{Event, EventBus, JobId, ListenerId, TabId, TabweaveError};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::binder::RenderTargetBinder;
use crate::document::{DocumentParser, NodeId};
use crate::errors::LoadError;
use crate::focus::{FocusCoordinator, FocusOutcome, FocusTransition};
use crate::layout::{LayoutEngine, Size, VisualState};
use crate::listeners::{DispatchContext, EventKind, TabEvent, TabRequest};
use crate::load::{LoadCoordinator, PollReport, Request, Transport};
use crate::router::{DispatchOutcome, EventRouter};
use crate::tab::{ClosedTab, LoadState, NavigationIntent, TabSet};
use crate::visibility::VisibilityController;

/// Upper bound on follow-up rounds after one dispatch. Listeners that keep
/// activating each other's tabs are cut off here.
const MAX_SETTLE_ROUNDS: usize = 32;

#[derive(Debug, Clone)]
pub struct BrowserOptions {
    pub max_tabs: usize,
    pub history_limit: usize,
    pub fetch_timeout: Duration,
    pub allowed_schemes: Vec<String>,
    /// Opened by a new-tab command without a URL.
    pub home_url: String,
    pub viewport: Size,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            max_tabs: 64,
            history_limit: 100,
            fetch_timeout: Duration::from_millis(15_000),
            allowed_schemes: vec!["gemini".into(), "file".into(), "about".into()],
            home_url: "about:blank".into(),
            viewport: Size::new(1024.0, 768.0),
        }
    }
}

/// What one tick did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    /// Tab whose deferred focus reconcile ran.
    pub reconciled: Option<TabId>,
    pub loads: PollReport,
}

/// Serializable view of one tab for logs and status output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabSnapshot {
    pub id: TabId,
    pub position: usize,
    pub title: String,
    pub url: Option<String>,
    pub load_state: LoadState,
    pub visual_state: VisualState,
    pub active: bool,
    pub pending_job: Option<JobId>,
    pub listeners: usize,
    pub history_len: usize,
    pub last_error: Option<String>,
}

pub struct TabBrowser {
    tabs: TabSet,
    loads: LoadCoordinator,
    binder: RenderTargetBinder,
    visibility: VisibilityController,
    router: EventRouter,
    focus: FocusCoordinator,
    layout: Box<dyn LayoutEngine>,
    events: EventBus,
    home_url: String,
    ticks: u64,
}

impl TabBrowser {
    pub fn new(
        options: BrowserOptions,
        transport: Arc<dyn Transport>,
        parser: Box<dyn DocumentParser>,
        layout: Box<dyn LayoutEngine>,
    ) -> Self {
        Self {
            tabs: TabSet::new(options.max_tabs, options.history_limit, options.viewport),
            loads: LoadCoordinator::new(
                transport,
                parser,
                options.fetch_timeout,
                options.allowed_schemes,
            ),
            binder: RenderTargetBinder::new(),
            visibility: VisibilityController::new(),
            router: EventRouter::new(),
            focus: FocusCoordinator::new(),
            layout,
            events: EventBus::default(),
            home_url: options.home_url,
            ticks: 0,
        }
    }

    // -- Accessors --

    pub fn tabs(&self) -> &TabSet {
        &self.tabs
    }

    pub fn loads(&self) -> &LoadCoordinator {
        &self.loads
    }

    pub fn router(&self) -> &EventRouter {
        &self.router
    }

    pub fn focus(&self) -> &FocusCoordinator {
        &self.focus
    }

    pub fn visibility(&self) -> &VisibilityController {
        &self.visibility
    }

    pub fn binder(&self) -> &RenderTargetBinder {
        &self.binder
    }

    pub fn active_id(&self) -> Option<TabId> {
        self.tabs.active_id()
    }

    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    pub fn home_url(&self) -> &str {
        &self.home_url
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    /// Size of a node in a tab's last layout pass.
    pub fn measure(&self, tab: TabId, node: NodeId) -> Option<Size> {
        let tab = self.tabs.get(tab)?;
        self.layout.measure(tab.surface(), node)
    }

    pub fn snapshot(&self) -> Vec<TabSnapshot> {
        let active = self.tabs.active_id();
        self.tabs
            .iter()
            .enumerate()
            .map(|(position, tab)| TabSnapshot {
                id: tab.id(),
                position,
                title: tab.title().to_string(),
                url: tab.url().map(|u| u.to_string()),
                load_state: tab.load_state(),
                visual_state: tab.visual_state(),
                active: active == Some(tab.id()),
                pending_job: self.loads.pending_for(tab.id()),
                listeners: tab.listeners().len(),
                history_len: tab.history().len(),
                last_error: tab.last_error().map(|e| e.to_string()),
            })
            .collect()
    }

    // -- Tab strip --

    /// Open a tab, optionally loading `url` into it. The first tab opened
    /// becomes active.
    pub fn open_tab(&mut self, url: Option<&str>) -> Result<TabId, TabweaveError> {
        let request = url.map(|u| self.prepare(u)).transpose()?;
        let id = self.tabs.open()?;
        self.events.publish(Event::TabOpened(id));

        if self.tabs.active_id().is_none() {
            let outcome = self.switch(id)?;
            self.settle(outcome.dispatch);
        }
        if let Some(request) = request {
            self.start(id, request, NavigationIntent::Push)?;
        }
        Ok(id)
    }

    pub fn close_tab(&mut self, id: TabId) -> Result<ClosedTab, TabweaveError> {
        let closed = self.tabs.close(id).ok_or(TabweaveError::UnknownTab(id))?;
        if let Some(follow_up) = self.after_close(closed) {
            self.settle(follow_up);
        }
        Ok(closed)
    }

    /// Make `id` the active tab. Returns the transition, or `None` if it
    /// already was.
    pub fn activate(&mut self, id: TabId) -> Result<Option<FocusTransition>, TabweaveError> {
        let outcome = self.switch(id)?;
        self.settle(outcome.dispatch);
        Ok(outcome.transition)
    }

    pub fn activate_next(&mut self) -> Result<Option<FocusTransition>, TabweaveError> {
        match self.tabs.next_id() {
            Some(id) => self.activate(id),
            None => Ok(None),
        }
    }

    pub fn activate_prev(&mut self) -> Result<Option<FocusTransition>, TabweaveError> {
        match self.tabs.prev_id() {
            Some(id) => self.activate(id),
            None => Ok(None),
        }
    }

    // -- Navigation --

    pub fn navigate(&mut self, tab: TabId, url: &str) -> Result<JobId, TabweaveError> {
        let request = self.prepare(url)?;
        self.start(tab, request, NavigationIntent::Push)
    }

    /// Load the previous history entry. `None` when there is none.
    pub fn back(&mut self, tab: TabId) -> Result<Option<JobId>, TabweaveError> {
        let target = self.tab(tab)?.history().back_target().cloned();
        target
            .map(|url| self.start(tab, Request::from_url(url), NavigationIntent::Back))
            .transpose()
    }

    pub fn forward(&mut self, tab: TabId) -> Result<Option<JobId>, TabweaveError> {
        let target = self.tab(tab)?.history().forward_target().cloned();
        target
            .map(|url| self.start(tab, Request::from_url(url), NavigationIntent::Forward))
            .transpose()
    }

    /// Load the tab's current URL again. `None` when nothing was loaded.
    pub fn reload(&mut self, tab: TabId) -> Result<Option<JobId>, TabweaveError> {
        let target = self.tab(tab)?.url().cloned();
        target
            .map(|url| self.start(tab, Request::from_url(url), NavigationIntent::Reload))
            .transpose()
    }

    /// Cancel the tab's load. Returns whether one was running.
    pub fn stop(&mut self, tab: TabId) -> Result<bool, TabweaveError> {
        self.tab(tab)?;
        Ok(self.loads.stop(&mut self.tabs, tab).is_some())
    }

    // -- Input and scripts --

    /// Route an input event to the active tab and apply whatever its
    /// listeners asked for.
    pub fn dispatch_input(&mut self, event: TabEvent) -> DispatchOutcome {
        let outcome = self.router.dispatch(&mut self.tabs, event);
        self.settle(outcome)
    }

    pub fn register_listener<F>(
        &mut self,
        tab: TabId,
        kind: EventKind,
        handler: F,
    ) -> Result<ListenerId, TabweaveError>
    where
        F: FnMut(&TabEvent, &mut DispatchContext) + 'static,
    {
        self.tabs.register_listener(tab, kind, handler)
    }

    pub fn unregister_listener(&mut self, tab: TabId, listener: ListenerId) -> bool {
        self.tabs.unregister_listener(tab, listener)
    }

    // -- Tick --

    /// One UI tick: run the focus reconcile queued by the last switch, then
    /// poll every load without blocking.
    pub fn tick(&mut self) -> TickReport {
        self.ticks += 1;
        let reconciled = self
            .focus
            .run_deferred(&mut self.tabs, &mut self.visibility, self.layout.as_mut());
        let loads = self.loads.poll(
            &mut self.tabs,
            &mut self.binder,
            &mut self.visibility,
            self.layout.as_mut(),
        );

        for done in &loads.rendered {
            self.events.publish(Event::LoadFinished {
                tab: done.tab,
                job: done.job,
                url: done.url.clone(),
            });
        }
        for failure in &loads.failed {
            self.events.publish(Event::LoadFailed {
                tab: failure.tab,
                job: failure.job,
                url: failure.url.clone(),
                error: failure.error.to_string(),
            });
        }

        TickReport {
            tick: self.ticks,
            reconciled,
            loads,
        }
    }

    /// Cancel every load and announce shutdown.
    pub fn shutdown(&mut self) {
        let ids: Vec<TabId> = self.tabs.ids().to_vec();
        for id in ids {
            self.loads.cancel(id);
        }
        self.events.publish(Event::Shutdown);
    }

    // -- Internals --

    fn tab(&self, id: TabId) -> Result<&crate::tab::Tab, TabweaveError> {
        self.tabs.get(id).ok_or(TabweaveError::UnknownTab(id))
    }

    fn prepare(&self, url: &str) -> Result<Request, TabweaveError> {
        let request = Request::parse(url).map_err(|e| load_error(e.into()))?;
        if !self.loads.is_allowed(&request) {
            return Err(load_error(
                crate::errors::FetchError::UnsupportedScheme(request.scheme().to_string()).into(),
            ));
        }
        Ok(request)
    }

    fn start(
        &mut self,
        tab: TabId,
        request: Request,
        intent: NavigationIntent,
    ) -> Result<JobId, TabweaveError> {
        let url = request.to_string();
        let job = self
            .loads
            .start_load(&mut self.tabs, tab, request, intent)
            .map_err(|e| match e {
                LoadError::UnknownTab(id) => TabweaveError::UnknownTab(id),
                other => load_error(other),
            })?;
        self.events.publish(Event::LoadStarted { tab, job, url });
        Ok(job)
    }

    fn switch(&mut self, to: TabId) -> Result<FocusOutcome, TabweaveError> {
        let outcome = self.focus.switch_to(&mut self.tabs, &mut self.router, to)?;
        if let Some(transition) = outcome.transition {
            self.events.publish(Event::TabActivated {
                from: transition.from,
                to: transition.to,
            });
        }
        Ok(outcome)
    }

    /// Tear down what a closed tab left behind. If it was active, hand the
    /// active slot to its successor and return that switch's dispatch.
    fn after_close(&mut self, closed: ClosedTab) -> Option<DispatchOutcome> {
        self.loads.cancel(closed.id);
        self.focus.forget(closed.id);
        self.events.publish(Event::TabClosed(closed.id));

        if !closed.was_active || self.tabs.active_id().is_some() {
            return None;
        }
        let successor = closed
            .successor
            .filter(|id| self.tabs.contains(*id))
            .or_else(|| self.tabs.id_at(0))?;
        match self.switch(successor) {
            Ok(outcome) => Some(outcome.dispatch),
            Err(err) => {
                warn!(tab_id = %successor, error = %err, "could not activate successor");
                None
            }
        }
    }

    /// Apply closures and deferred requests from a dispatch, and from any
    /// dispatch those cause in turn.
    fn settle(&mut self, outcome: DispatchOutcome) -> DispatchOutcome {
        let mut total = DispatchOutcome::default();
        let mut queue = VecDeque::from([outcome]);
        let mut rounds = 0;

        while let Some(outcome) = queue.pop_front() {
            rounds += 1;
            if rounds > MAX_SETTLE_ROUNDS {
                warn!(dropped = queue.len() + 1, "listener follow-ups did not settle, dropping the rest");
                // Closures already happened; their teardown still has to run.
                let mut closures: VecDeque<ClosedTab> = std::iter::once(outcome)
                    .chain(queue.drain(..))
                    .flat_map(|rest| rest.closed)
                    .collect();
                while let Some(closed) = closures.pop_front() {
                    total.closed.push(closed);
                    if let Some(next) = self.after_close(closed) {
                        closures.extend(next.closed);
                    }
                }
                break;
            }
            for closed in &outcome.closed {
                if let Some(next) = self.after_close(*closed) {
                    queue.push_back(next);
                }
            }
            for request in &outcome.deferred {
                match request {
                    TabRequest::Activate(id) => match self.switch(*id) {
                        Ok(focus) => queue.push_back(focus.dispatch),
                        Err(err) => debug!(tab_id = %id, error = %err, "deferred activation dropped"),
                    },
                    TabRequest::Navigate { tab, url } => {
                        if let Err(err) = self.navigate(*tab, url) {
                            warn!(tab_id = %tab, url = %url, error = %err, "listener navigation rejected");
                        }
                    }
                    TabRequest::Close(_) | TabRequest::RemoveListener(_) => {}
                }
            }
            total.merge(outcome);
        }
        total
    }
}

fn load_error(err: LoadError) -> TabweaveError {
    TabweaveError::Load(err.to_string())
}
