//! Fakes shared by the unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crate::browser::{BrowserOptions, TabBrowser};
use crate::document::{DocumentParser, DocumentTree, NodeId, NodeKind};
use crate::errors::{FetchError, ParseError};
use crate::layout::{FlowLayout, Size};
use crate::load::{CancelFlag, Request, Transport};

type Slot = Arc<(Mutex<Option<Result<Vec<u8>, FetchError>>>, Condvar)>;

/// A transport whose fetches block until the test releases them, one URL
/// at a time.
#[derive(Default)]
pub struct GateTransport {
    slots: Mutex<HashMap<String, Slot>>,
    started: Mutex<Vec<String>>,
}

impl GateTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn slot(&self, url: &str) -> Slot {
        let mut slots = self.slots.lock().unwrap();
        Arc::clone(slots.entry(url.to_string()).or_default())
    }

    pub fn release(&self, url: &str, body: &str) {
        self.complete(url, Ok(body.as_bytes().to_vec()));
    }

    pub fn fail(&self, url: &str, error: FetchError) {
        self.complete(url, Err(error));
    }

    fn complete(&self, url: &str, result: Result<Vec<u8>, FetchError>) {
        let slot = self.slot(url);
        let (value, ready) = &*slot;
        *value.lock().unwrap() = Some(result);
        ready.notify_all();
    }

    /// URLs fetched so far, in call order.
    pub fn started(&self) -> Vec<String> {
        self.started.lock().unwrap().clone()
    }
}

impl Transport for GateTransport {
    fn fetch(&self, request: &Request, cancel: &CancelFlag) -> Result<Vec<u8>, FetchError> {
        self.started.lock().unwrap().push(request.as_str().to_string());
        let slot = self.slot(request.as_str());
        let (value, ready) = &*slot;
        let mut guard = value.lock().unwrap();
        loop {
            if cancel.is_cancelled() {
                return Err(FetchError::Cancelled);
            }
            if let Some(result) = guard.take() {
                self.slots.lock().unwrap().remove(request.as_str());
                return result;
            }
            guard = ready.wait_timeout(guard, Duration::from_millis(5)).unwrap().0;
        }
    }
}

/// One node per line; `# ` lines are headings. A payload of `!malformed`
/// fails to parse.
pub struct LineParser;

impl DocumentParser for LineParser {
    fn parse(&self, payload: &[u8], _request: &Request) -> Result<DocumentTree, ParseError> {
        let text = std::str::from_utf8(payload).map_err(|e| ParseError::Encoding(e.valid_up_to()))?;
        if text.trim() == "!malformed" {
            return Err(ParseError::Malformed("test payload".into()));
        }
        let mut doc = DocumentTree::new();
        for line in text.lines() {
            let kind = match line.strip_prefix("# ") {
                Some(heading) => NodeKind::Heading {
                    level: 1,
                    text: heading.to_string(),
                },
                None => NodeKind::Text(line.to_string()),
            };
            doc.push(NodeId::ROOT, kind);
        }
        Ok(doc)
    }
}

pub fn options() -> BrowserOptions {
    BrowserOptions {
        max_tabs: 8,
        history_limit: 10,
        fetch_timeout: Duration::from_secs(30),
        allowed_schemes: vec!["gemini".into(), "about".into()],
        home_url: "about:blank".into(),
        viewport: Size::new(200.0, 400.0),
    }
}

pub fn browser_with(options: BrowserOptions) -> (TabBrowser, Arc<GateTransport>) {
    let transport = GateTransport::new();
    let browser = TabBrowser::new(
        options,
        Arc::clone(&transport) as Arc<dyn Transport>,
        Box::new(LineParser),
        Box::new(FlowLayout::new(10.0, 20.0)),
    );
    (browser, transport)
}

pub fn browser() -> (TabBrowser, Arc<GateTransport>) {
    browser_with(options())
}

/// Tick until `done` holds, failing the test after a few seconds.
pub fn tick_until(browser: &mut TabBrowser, mut done: impl FnMut(&TabBrowser) -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !done(browser) {
        assert!(Instant::now() < deadline, "condition not reached in time");
        browser.tick();
        thread::sleep(Duration::from_millis(1));
    }
}

/// Tick until no load is pending and every cancelled worker has reported.
pub fn drain(browser: &mut TabBrowser) {
    tick_until(browser, |b| {
        !b.loads().has_pending() && b.loads().retired_count() == 0
    });
}
