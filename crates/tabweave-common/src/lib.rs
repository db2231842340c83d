pub mod commands;
pub mod errors;
pub mod events;
pub mod id;
pub mod notifications;

pub use commands::{BrowserCommand, CommandParseError};
pub use errors::{ConfigError, TabweaveError};
pub use events::{Event, EventBus};
pub use id::{IdAllocator, JobId, ListenerId, TabId};
pub use notifications::{Notification, NotificationLevel, NotificationQueue};

pub type Result<T> = std::result::Result<T, TabweaveError>;
