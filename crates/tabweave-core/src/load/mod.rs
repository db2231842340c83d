//! Load jobs: fetching off the UI thread and polling for completion.

mod coordinator;
mod request;
mod worker;

pub use coordinator::{JobStatus, LoadCompletion, LoadCoordinator, LoadFailure, PollReport};
pub use request::{CancelFlag, Request};
pub use worker::{FetchHandle, FetchWorker, Transport, WorkerPoll};
