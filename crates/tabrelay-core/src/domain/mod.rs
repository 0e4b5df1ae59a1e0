//! Domain model (IDs, tasks, settings, decisions, notifications, ...).

pub mod decision;
pub mod errors;
pub mod events;
pub mod ids;
pub mod locale;
pub mod notification;
pub mod policy;
pub mod settings;
pub mod state;
pub mod task;

pub use decision::{Decider, Decision, DefaultDecider};
pub use errors::{HandoffError, StoreError};
pub use events::{BrowserEvent, TabInfo, TabStatus};
pub use ids::{NotificationId, TabId};
pub use locale::{Locale, MessageKey};
pub use notification::{Notification, NotificationKind};
pub use policy::RetryPolicy;
pub use settings::{AiTarget, Settings};
pub use state::{DriveOutcome, HandoffState};
pub use task::{PendingTask, TaskPatch};
