//! Handoff state machine per target tab.
//!
//! ```text
//! NONE -> PENDING -> SUBMITTED -> NONE
//!                 -> FAILED    -> NONE
//! ```
//! Both terminal states collapse back to `None` once the record is deleted.

use serde::{Deserialize, Serialize};

use super::task::PendingTask;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HandoffState {
    None,
    Pending,
    Submitted,
    Failed,
}

impl HandoffState {
    /// State as seen through the task store alone.
    pub fn of(task: Option<&PendingTask>) -> Self {
        match task {
            None => HandoffState::None,
            Some(t) if t.submitted => HandoffState::Submitted,
            Some(_) => HandoffState::Pending,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, HandoffState::Submitted | HandoffState::Failed)
    }

    /// Is a readiness signal allowed to start a drive?
    pub fn accepts_readiness(self) -> bool {
        matches!(self, HandoffState::Pending)
    }
}

/// How one drive of the retry driver ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveOutcome {
    /// The remote capability acknowledged; success notification scheduled.
    Submitted { attempts: u32 },

    /// All attempts failed; failure notification sent.
    Exhausted { attempts: u32 },

    /// The task disappeared (tab closed) or was already submitted; nothing
    /// was reported.
    Abandoned { attempt: u32 },
}

impl DriveOutcome {
    pub fn state(self) -> HandoffState {
        match self {
            DriveOutcome::Submitted { .. } => HandoffState::Submitted,
            DriveOutcome::Exhausted { .. } => HandoffState::Failed,
            DriveOutcome::Abandoned { .. } => HandoffState::None,
        }
    }
}
