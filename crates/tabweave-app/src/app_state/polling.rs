//! Draining the browser's event bus.

use tabweave_common::{Event, Notification};
use tokio::sync::broadcast::error::TryRecvError;
use tracing::{debug, warn};

use super::HeadlessApp;

impl HeadlessApp {
    /// Turn load failures into notifications and drop notifications for
    /// tabs that have closed. Never blocks.
    pub(super) fn poll_events(&mut self) {
        loop {
            match self.events.try_recv() {
                Ok(Event::LoadFailed {
                    tab, url, error, ..
                }) => {
                    self.notifications
                        .push(Notification::load_failed(tab, &url, &error));
                }
                Ok(Event::TabClosed(tab)) => self.notifications.dismiss_tab(tab),
                Ok(event) => debug!(?event, "browser event"),
                Err(TryRecvError::Lagged(missed)) => {
                    warn!(missed, "event receiver lagged");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
    }
}
