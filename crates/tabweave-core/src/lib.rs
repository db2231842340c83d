//! Tab-scoped load, render, and event coordination.
//!
//! A [`TabBrowser`] owns a set of tabs and drives them from a single UI
//! thread with a fixed-rate [`TabBrowser::tick`]:
//!
//! - navigations become load jobs bound to their origin tab, fetched on
//!   worker threads and polled without blocking;
//! - parsed documents are written into the origin tab, never into whichever
//!   tab happens to be active when the fetch completes;
//! - hidden tabs are briefly made layout-eligible so their geometry is
//!   measured correctly, then restored;
//! - input and focus notifications reach only the active tab's listeners.
//!
//! The network transport, document parser, and layout engine are
//! collaborators behind the [`Transport`], [`DocumentParser`], and
//! [`LayoutEngine`] traits.

pub mod binder;
pub mod browser;
pub mod document;
pub mod errors;
pub mod focus;
pub mod layout;
pub mod listeners;
pub mod load;
pub mod router;
pub mod tab;
pub mod visibility;

#[cfg(test)]
pub(crate) mod testing;

pub use binder::{BindOutcome, RenderTargetBinder};
pub use browser::{BrowserOptions, TabBrowser, TabSnapshot, TickReport};
pub use document::{DocumentParser, DocumentTree, Node, NodeId, NodeKind};
pub use errors::{FetchError, LayoutError, LoadError, ParseError};
pub use focus::{FocusCoordinator, FocusOutcome, FocusTransition};
pub use layout::{
    FlowLayout, Geometry, GeometryState, LayoutBox, LayoutEngine, LayoutSurface, Size, VisualState,
};
pub use listeners::{DispatchContext, EventKind, ListenerSet, ScopedListener, TabEvent, TabRequest};
pub use load::{
    CancelFlag, FetchHandle, FetchWorker, JobStatus, LoadCompletion, LoadCoordinator, LoadFailure,
    PollReport, Request, Transport, WorkerPoll,
};
pub use router::{DispatchOutcome, EventRouter};
pub use tab::{ClosedTab, History, LoadState, NavigationIntent, Tab, TabSet, TabStrip};
pub use visibility::{LayoutGuard, VisibilityController};
