//! Fetch workers.
//!
//! Each job gets its own named thread. The thread owns the transport call
//! and reports through a oneshot channel; it never sees tab state. The UI
//! thread checks the channel with `try_recv` once per tick.

use std::sync::Arc;
use std::thread;

use tabweave_common::JobId;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::trace;

use crate::errors::FetchError;

use super::request::{CancelFlag, Request};

pub type FetchResult = Result<Vec<u8>, FetchError>;

/// The network collaborator. Called on a worker thread, so it may block.
pub trait Transport: Send + Sync + 'static {
    fn fetch(&self, request: &Request, cancel: &CancelFlag) -> FetchResult;
}

#[derive(Debug)]
pub enum WorkerPoll {
    Pending,
    Ready(FetchResult),
}

pub struct FetchWorker;

impl FetchWorker {
    pub fn spawn(
        transport: Arc<dyn Transport>,
        job: JobId,
        request: Request,
    ) -> Result<FetchHandle, FetchError> {
        let (tx, rx) = oneshot::channel();
        let cancel = CancelFlag::new();
        let worker_cancel = cancel.clone();

        thread::Builder::new()
            .name(format!("fetch-{job}"))
            .spawn(move || {
                let result = if worker_cancel.is_cancelled() {
                    Err(FetchError::Cancelled)
                } else {
                    transport.fetch(&request, &worker_cancel)
                };
                let result = if worker_cancel.is_cancelled() {
                    Err(FetchError::Cancelled)
                } else {
                    result
                };
                // receiver may be gone if the job was dropped
                let _ = tx.send(result);
            })
            .map_err(|e| FetchError::Spawn(e.to_string()))?;

        trace!(job_id = %job, "fetch worker spawned");
        Ok(FetchHandle { job, rx, cancel })
    }
}

/// The UI side of a running fetch.
#[derive(Debug)]
pub struct FetchHandle {
    job: JobId,
    rx: oneshot::Receiver<FetchResult>,
    cancel: CancelFlag,
}

impl FetchHandle {
    pub fn job(&self) -> JobId {
        self.job
    }

    /// Non-blocking completion check.
    pub fn poll(&mut self) -> WorkerPoll {
        match self.rx.try_recv() {
            Ok(result) => WorkerPoll::Ready(result),
            Err(TryRecvError::Empty) => WorkerPoll::Pending,
            Err(TryRecvError::Closed) => WorkerPoll::Ready(Err(FetchError::WorkerLost)),
        }
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;

    struct Echo;

    impl Transport for Echo {
        fn fetch(&self, request: &Request, _cancel: &CancelFlag) -> FetchResult {
            Ok(request.as_str().as_bytes().to_vec())
        }
    }

    struct Panicking;

    impl Transport for Panicking {
        fn fetch(&self, _request: &Request, _cancel: &CancelFlag) -> FetchResult {
            panic!("transport blew up");
        }
    }

    fn wait(handle: &mut FetchHandle) -> FetchResult {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let WorkerPoll::Ready(result) = handle.poll() {
                return result;
            }
            assert!(Instant::now() < deadline, "worker never finished");
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn worker_delivers_payload() {
        let req = Request::parse("about:blank").unwrap();
        let mut handle = FetchWorker::spawn(Arc::new(Echo), JobId(1), req).unwrap();
        assert_eq!(wait(&mut handle).unwrap(), b"about:blank".to_vec());
    }

    #[test]
    fn dead_worker_is_reported_as_lost() {
        let req = Request::parse("about:blank").unwrap();
        let mut handle = FetchWorker::spawn(Arc::new(Panicking), JobId(2), req).unwrap();
        assert_eq!(wait(&mut handle), Err(FetchError::WorkerLost));
    }
}
