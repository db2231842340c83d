//! Headless application state.
//!
//! Owns the browser, the notification queue that stands in for an error
//! display, and the queue of scripted commands. [`HeadlessApp::run`] drives
//! everything at the configured tick rate.

mod polling;
mod script;

pub use script::load_script;

use std::collections::VecDeque;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use tabweave_common::{BrowserCommand, Event, Notification, NotificationQueue, TabId, TabweaveError};
use tabweave_config::TabweaveConfig;
use tabweave_core::{BrowserOptions, FlowLayout, Size, TabBrowser};
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::parser::GemtextParser;
use crate::transport::LocalTransport;

/// Totals over one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub rendered: usize,
    pub failed: usize,
    pub discarded: usize,
}

pub struct HeadlessApp {
    config: TabweaveConfig,
    browser: TabBrowser,
    events: broadcast::Receiver<Event>,
    notifications: NotificationQueue,
    script: VecDeque<BrowserCommand>,
}

impl HeadlessApp {
    pub fn new(config: TabweaveConfig) -> Self {
        let browser = TabBrowser::new(
            browser_options(&config),
            Arc::new(LocalTransport::new(config.network.user_agent.clone())),
            Box::new(GemtextParser),
            Box::new(FlowLayout::new(
                config.layout.char_width,
                config.layout.line_height,
            )),
        );
        let events = browser.subscribe();
        Self {
            config,
            browser,
            events,
            notifications: NotificationQueue::default(),
            script: VecDeque::new(),
        }
    }

    pub fn browser(&self) -> &TabBrowser {
        &self.browser
    }

    pub fn notifications(&mut self) -> &mut NotificationQueue {
        &mut self.notifications
    }

    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = BrowserCommand>) {
        self.script.extend(commands);
    }

    /// Open a tab loading `url`.
    pub fn open(&mut self, url: &str) -> Result<TabId, TabweaveError> {
        self.browser.open_tab(Some(url))
    }

    /// Tick until the script is exhausted, nothing is loading and no focus
    /// reconcile is queued, or until `max_ticks`.
    pub fn run(&mut self, max_ticks: Option<u64>) -> RunSummary {
        let interval = self.config.runtime.tick_interval();
        let mut summary = RunSummary::default();
        info!(interval_ms = interval.as_millis() as u64, "entering tick loop");

        loop {
            let started = Instant::now();

            if let Some(command) = self.script.pop_front() {
                self.execute(command);
            }

            let report = self.browser.tick();
            summary.ticks = report.tick;
            summary.rendered += report.loads.rendered.len();
            summary.failed += report.loads.failed.len();
            summary.discarded += report.loads.discarded;
            self.poll_events();

            if self.is_idle() {
                break;
            }
            if max_ticks.is_some_and(|max| summary.ticks >= max) {
                warn!(
                    pending = self.browser.loads().pending_count(),
                    "tick limit reached with work outstanding"
                );
                break;
            }

            if let Some(rest) = interval.checked_sub(started.elapsed()) {
                thread::sleep(rest);
            }
        }

        self.browser.shutdown();
        self.poll_events();
        self.log_summary();
        summary
    }

    /// Nothing scripted, loading, or waiting on a focus reconcile.
    fn is_idle(&self) -> bool {
        self.script.is_empty()
            && !self.browser.loads().has_pending()
            && self.browser.focus().pending_reconcile().is_none()
    }

    fn execute(&mut self, command: BrowserCommand) {
        let label = command.label();
        if let Err(e) = self.browser.execute(command) {
            warn!(command = label, error = %e, "command failed");
            self.notifications.push(Notification::error(label, e.to_string()));
        }
    }

    fn log_summary(&self) {
        for tab in self.browser.snapshot() {
            match serde_json::to_string(&tab) {
                Ok(json) => info!(tab_id = %tab.id, "{json}"),
                Err(e) => warn!(tab_id = %tab.id, "failed to serialize tab snapshot: {e}"),
            }
        }
    }
}

fn browser_options(config: &TabweaveConfig) -> BrowserOptions {
    BrowserOptions {
        max_tabs: config.tabs.max_tabs as usize,
        history_limit: config.tabs.history_limit as usize,
        fetch_timeout: config.network.fetch_timeout(),
        allowed_schemes: config.network.allowed_schemes.clone(),
        home_url: config.tabs.home_url.clone(),
        viewport: Size::new(config.layout.viewport_width, config.layout.viewport_height),
    }
}
