//! The load coordinator: one job per tab, polled once per tick.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tabweave_common::{IdAllocator, JobId, TabId};
use tracing::{debug, info, warn};

use crate::binder::{BindOutcome, RenderTargetBinder};
use crate::document::DocumentParser;
use crate::errors::{FetchError, LayoutError, LoadError};
use crate::layout::LayoutEngine;
use crate::tab::{LoadState, NavigationIntent, TabSet};
use crate::visibility::VisibilityController;

use super::request::Request;
use super::worker::{FetchHandle, FetchWorker, Transport, WorkerPoll};

/// Finished jobs whose final status is still answerable by `status_of`.
const STATUS_HISTORY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Pending,
    Complete,
    Failed,
    Cancelled,
}

/// A load that rendered into its tab.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadCompletion {
    pub tab: TabId,
    pub job: JobId,
    pub url: String,
    pub layout_error: Option<LayoutError>,
}

/// A load that failed; the tab kept its previous document.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadFailure {
    pub tab: TabId,
    pub job: JobId,
    pub url: String,
    pub error: LoadError,
}

/// Everything one poll finished.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PollReport {
    pub rendered: Vec<LoadCompletion>,
    pub failed: Vec<LoadFailure>,
    /// Completions whose origin tab had been closed.
    pub stale: Vec<TabId>,
    /// Completions of cancelled or superseded jobs, dropped unread, plus
    /// cancelled workers given up on after a full fetch timeout.
    pub discarded: usize,
}

impl PollReport {
    pub fn is_empty(&self) -> bool {
        self.rendered.is_empty()
            && self.failed.is_empty()
            && self.stale.is_empty()
            && self.discarded == 0
    }
}

#[derive(Debug)]
struct LoadJob {
    id: JobId,
    origin_tab: TabId,
    request: Request,
    intent: NavigationIntent,
    handle: FetchHandle,
    status: JobStatus,
    started_at: Instant,
    retired_at: Option<Instant>,
    /// What the tab showed before this navigation began, for `stop`.
    prior_state: LoadState,
}

impl LoadJob {
    fn retire(&mut self, status: JobStatus) {
        self.handle.cancel();
        self.status = status;
        self.retired_at = Some(Instant::now());
    }
}

pub struct LoadCoordinator {
    transport: Arc<dyn Transport>,
    parser: Box<dyn DocumentParser>,
    jobs: HashMap<TabId, LoadJob>,
    /// Cancelled jobs whose workers have not reported yet.
    retired: Vec<LoadJob>,
    finished: VecDeque<(JobId, JobStatus)>,
    ids: IdAllocator,
    fetch_timeout: Duration,
    allowed_schemes: Vec<String>,
}

impl LoadCoordinator {
    pub fn new(
        transport: Arc<dyn Transport>,
        parser: Box<dyn DocumentParser>,
        fetch_timeout: Duration,
        allowed_schemes: Vec<String>,
    ) -> Self {
        Self {
            transport,
            parser,
            jobs: HashMap::new(),
            retired: Vec::new(),
            finished: VecDeque::new(),
            ids: IdAllocator::new(),
            fetch_timeout,
            allowed_schemes,
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout
    }

    pub fn pending_for(&self, tab: TabId) -> Option<JobId> {
        self.jobs.get(&tab).map(|job| job.id)
    }

    pub fn has_pending(&self) -> bool {
        !self.jobs.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.jobs.len()
    }

    /// Cancelled jobs still waiting on their workers.
    pub fn retired_count(&self) -> usize {
        self.retired.len()
    }

    /// Status of a live or recently finished job. Only the last
    /// `STATUS_HISTORY` finished jobs are remembered.
    pub fn status_of(&self, job: JobId) -> Option<JobStatus> {
        self.jobs
            .values()
            .chain(self.retired.iter())
            .find(|j| j.id == job)
            .map(|j| j.status)
            .or_else(|| {
                self.finished
                    .iter()
                    .rev()
                    .find(|(id, _)| *id == job)
                    .map(|(_, status)| *status)
            })
    }

    pub fn is_allowed(&self, request: &Request) -> bool {
        self.allowed_schemes
            .iter()
            .any(|s| s.eq_ignore_ascii_case(request.scheme()))
    }

    /// Start loading `request` into `tab`.
    ///
    /// The job is bound to `tab` for its whole life. A job already running
    /// for the tab is cancelled first; its result will be discarded.
    pub fn start_load(
        &mut self,
        tabs: &mut TabSet,
        tab: TabId,
        request: Request,
        intent: NavigationIntent,
    ) -> Result<JobId, LoadError> {
        let current = tabs
            .get(tab)
            .map(|t| t.load_state())
            .ok_or(LoadError::UnknownTab(tab))?;
        if !self.is_allowed(&request) {
            return Err(FetchError::UnsupportedScheme(request.scheme().to_string()).into());
        }

        let prior_state = match self.retire_job(tab) {
            Some(prior) => prior,
            None => current,
        };

        let id = self.ids.next_job();
        let handle = match FetchWorker::spawn(Arc::clone(&self.transport), id, request.clone()) {
            Ok(handle) => handle,
            Err(err) => {
                if let Some(t) = tabs.get_mut(tab) {
                    t.set_load_state(prior_state);
                }
                return Err(err.into());
            }
        };

        if let Some(t) = tabs.get_mut(tab) {
            t.set_load_state(LoadState::Loading);
        }
        info!(tab_id = %tab, job_id = %id, url = %request, "load started");
        self.jobs.insert(
            tab,
            LoadJob {
                id,
                origin_tab: tab,
                request,
                intent,
                handle,
                status: JobStatus::Pending,
                started_at: Instant::now(),
                retired_at: None,
                prior_state,
            },
        );
        Ok(id)
    }

    /// Cancel the tab's job without touching the tab. Used when the tab is
    /// closing.
    pub fn cancel(&mut self, tab: TabId) -> Option<JobId> {
        let id = self.pending_for(tab)?;
        self.retire_job(tab);
        debug!(tab_id = %tab, job_id = %id, "load cancelled");
        Some(id)
    }

    /// Cancel the tab's job and put the tab back the way it was before the
    /// navigation started.
    pub fn stop(&mut self, tabs: &mut TabSet, tab: TabId) -> Option<JobId> {
        let id = self.pending_for(tab)?;
        let prior = self.retire_job(tab)?;
        if let Some(t) = tabs.get_mut(tab) {
            let restored = match prior {
                LoadState::Loading | LoadState::Rendering => {
                    if t.document().is_empty() {
                        LoadState::Idle
                    } else {
                        LoadState::Ready
                    }
                }
                other => other,
            };
            t.set_load_state(restored);
        }
        info!(tab_id = %tab, job_id = %id, "load stopped");
        Some(id)
    }

    fn retire_job(&mut self, tab: TabId) -> Option<LoadState> {
        let mut job = self.jobs.remove(&tab)?;
        job.retire(JobStatus::Cancelled);
        let prior = job.prior_state;
        self.retired.push(job);
        Some(prior)
    }

    /// Check every worker without blocking and finish the ones that are
    /// done. Completions are handled in job order; each is written into
    /// its own origin tab.
    pub fn poll(
        &mut self,
        tabs: &mut TabSet,
        binder: &mut RenderTargetBinder,
        visibility: &mut VisibilityController,
        engine: &mut dyn LayoutEngine,
    ) -> PollReport {
        let mut report = PollReport::default();

        // A worker whose transport ignores its cancel flag is dropped after
        // a full timeout; its late send then fails silently.
        let abandon_after = self.fetch_timeout;
        let mut settled = Vec::new();
        self.retired.retain_mut(|job| match job.handle.poll() {
            WorkerPoll::Ready(_) => {
                debug!(tab_id = %job.origin_tab, job_id = %job.id, "cancelled completion discarded");
                settled.push((job.id, job.status));
                false
            }
            WorkerPoll::Pending
                if job
                    .retired_at
                    .is_some_and(|at| at.elapsed() >= abandon_after) =>
            {
                warn!(tab_id = %job.origin_tab, job_id = %job.id, "cancelled worker never reported, abandoning it");
                settled.push((job.id, job.status));
                false
            }
            WorkerPoll::Pending => true,
        });
        report.discarded += settled.len();
        for (id, status) in settled {
            self.record(id, status);
        }

        let mut order: Vec<(JobId, TabId)> = self.jobs.iter().map(|(t, j)| (j.id, *t)).collect();
        order.sort_unstable();

        for (_, tab) in order {
            let Some(job) = self.jobs.get_mut(&tab) else {
                continue;
            };
            let result = match job.handle.poll() {
                WorkerPoll::Ready(result) => result,
                WorkerPoll::Pending if job.started_at.elapsed() >= self.fetch_timeout => {
                    Err(FetchError::TimedOut(self.fetch_timeout))
                }
                WorkerPoll::Pending => continue,
            };
            let Some(mut job) = self.jobs.remove(&tab) else {
                continue;
            };
            let timed_out = matches!(result, Err(FetchError::TimedOut(_)));
            let finished = self.finish(tabs, binder, visibility, engine, &job, result);
            let status = finished.status();
            if timed_out {
                // the worker may still deliver; park it so the late result
                // is counted and dropped
                job.retire(status);
                self.retired.push(job);
            } else {
                self.record(job.id, status);
            }
            report.absorb(finished);
        }
        report
    }

    fn record(&mut self, job: JobId, status: JobStatus) {
        if self.finished.len() == STATUS_HISTORY {
            self.finished.pop_front();
        }
        self.finished.push_back((job, status));
    }

    fn finish(
        &self,
        tabs: &mut TabSet,
        binder: &mut RenderTargetBinder,
        visibility: &mut VisibilityController,
        engine: &mut dyn LayoutEngine,
        job: &LoadJob,
        result: Result<Vec<u8>, FetchError>,
    ) -> Finished {
        let origin = job.origin_tab;
        let parsed = result
            .map_err(LoadError::from)
            .and_then(|payload| self.parser.parse(&payload, &job.request).map_err(LoadError::from));

        match parsed {
            Ok(document) => match binder.bind_and_render(tabs, origin, document, visibility, engine) {
                BindOutcome::StaleTarget(tab) => Finished::Stale(tab),
                outcome => {
                    if let Some(tab) = tabs.get_mut(origin) {
                        tab.commit_navigation(&job.request, job.intent);
                    }
                    info!(tab_id = %origin, job_id = %job.id, url = %job.request, "load finished");
                    Finished::Rendered(LoadCompletion {
                        tab: origin,
                        job: job.id,
                        url: job.request.to_string(),
                        layout_error: match outcome {
                            BindOutcome::RenderedWithoutLayout(_, err) => Some(err),
                            _ => None,
                        },
                    })
                }
            },
            Err(error) => match tabs.get_mut(origin) {
                Some(tab) => {
                    warn!(tab_id = %origin, job_id = %job.id, url = %job.request, %error, "load failed");
                    tab.fail(error.clone());
                    Finished::Failed(LoadFailure {
                        tab: origin,
                        job: job.id,
                        url: job.request.to_string(),
                        error,
                    })
                }
                None => {
                    debug!(tab_id = %origin, job_id = %job.id, "failure for closed tab dropped");
                    Finished::Stale(origin)
                }
            },
        }
    }
}

enum Finished {
    Rendered(LoadCompletion),
    Failed(LoadFailure),
    Stale(TabId),
}

impl Finished {
    fn status(&self) -> JobStatus {
        match self {
            Finished::Rendered(_) => JobStatus::Complete,
            Finished::Failed(_) => JobStatus::Failed,
            Finished::Stale(_) => JobStatus::Cancelled,
        }
    }
}

impl PollReport {
    fn absorb(&mut self, finished: Finished) {
        match finished {
            Finished::Rendered(done) => self.rendered.push(done),
            Finished::Failed(failure) => self.failed.push(failure),
            Finished::Stale(tab) => self.stale.push(tab),
        }
    }
}
