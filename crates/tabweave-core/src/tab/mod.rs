//! Tabs, the ordered tab strip, and the tab set that owns them.

mod history;
mod set;
mod strip;
mod types;

pub use history::{History, NavigationIntent};
pub use set::{ClosedTab, TabSet};
pub use strip::TabStrip;
pub use types::{LoadState, Tab};
