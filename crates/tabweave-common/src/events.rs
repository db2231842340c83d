use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::id::{JobId, TabId};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    TabOpened(TabId),
    TabClosed(TabId),
    TabActivated {
        from: Option<TabId>,
        to: TabId,
    },
    LoadStarted {
        tab: TabId,
        job: JobId,
        url: String,
    },
    LoadFinished {
        tab: TabId,
        job: JobId,
        url: String,
    },
    LoadFailed {
        tab: TabId,
        job: JobId,
        url: String,
        error: String,
    },
    Shutdown,
    #[serde(other)]
    Unknown,
}

/// Fan-out of coordinator events to any number of observers (UI chrome,
/// error display, tests). Publishing never blocks the tick.
pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: Event) -> usize {
        self.sender.send(event).unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(Event::TabOpened(TabId(1)));

        let event = rx.recv().await.unwrap();
        assert!(matches!(event, Event::TabOpened(TabId(1))));
    }

    #[tokio::test]
    async fn multiple_subscribers() {
        let bus = EventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(Event::Shutdown);

        let e1 = rx1.recv().await.unwrap();
        let e2 = rx2.recv().await.unwrap();
        assert!(matches!(e1, Event::Shutdown));
        assert!(matches!(e2, Event::Shutdown));
    }

    #[tokio::test]
    async fn load_lifecycle_events_keep_order() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();
        let tab = TabId(3);
        let job = JobId(8);

        bus.publish(Event::LoadStarted {
            tab,
            job,
            url: "gemini://example.org/".into(),
        });
        bus.publish(Event::LoadFailed {
            tab,
            job,
            url: "gemini://example.org/".into(),
            error: "connection refused".into(),
        });

        let e1 = rx.recv().await.unwrap();
        assert!(matches!(e1, Event::LoadStarted { tab: t, .. } if t == tab));

        let e2 = rx.recv().await.unwrap();
        assert!(
            matches!(e2, Event::LoadFailed { ref error, job: j, .. } if error == "connection refused" && j == job)
        );
    }

    #[test]
    fn try_recv_works_without_runtime() {
        let bus = EventBus::new(4);
        let mut rx = bus.subscribe();
        bus.publish(Event::TabActivated {
            from: None,
            to: TabId(1),
        });
        let event = rx.try_recv().unwrap();
        assert!(matches!(event, Event::TabActivated { from: None, to: TabId(1) }));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn publish_returns_zero_with_no_subscribers() {
        let bus = EventBus::new(16);
        assert_eq!(bus.publish(Event::Shutdown), 0);
    }

    #[test]
    fn unknown_event_deserializes() {
        let json = r#"{"type":"SomeNewEventWeNeverHeardOf","data":null}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert!(matches!(event, Event::Unknown));
    }
}
