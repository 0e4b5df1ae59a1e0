//! Decision model: what the retry driver does after a failed attempt.
//!
//! The Decider is a pure function of the attempt number and the
//! acknowledgement; carrying the decision out (sleeping, notifying,
//! deleting the task) is the driver's job.

use std::time::Duration;

use super::policy::RetryPolicy;
use crate::protocol::Acknowledgement;

#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Try again after `delay`.
    Retry {
        delay: Duration,
        next_attempt: u32,
        reason: String,
    },

    /// Give up and tell the user to act manually.
    Escalate { reason: String },
}

pub trait Decider: Send + Sync {
    /// Decide what follows failed attempt `attempt` (0-based).
    fn decide(&self, attempt: u32, ack: &Acknowledgement) -> Decision;
}

/// Attempt-count based decider backed by a [`RetryPolicy`].
#[derive(Debug, Clone, Default)]
pub struct DefaultDecider {
    retry_policy: RetryPolicy,
}

impl DefaultDecider {
    pub fn new(retry_policy: RetryPolicy) -> Self {
        Self { retry_policy }
    }
}

impl Decider for DefaultDecider {
    fn decide(&self, attempt: u32, ack: &Acknowledgement) -> Decision {
        if self.retry_policy.allows_retry(attempt) {
            let delay = self.retry_policy.next_delay(attempt);
            Decision::Retry {
                delay,
                next_attempt: attempt + 1,
                reason: format!(
                    "attempt {}/{} failed ({}), retrying after {:?}",
                    attempt + 1,
                    self.retry_policy.max_attempts(),
                    ack.describe(),
                    delay
                ),
            }
        } else {
            Decision::Escalate {
                reason: format!(
                    "max attempts reached: {}/{} (last: {})",
                    attempt + 1,
                    self.retry_policy.max_attempts(),
                    ack.describe()
                ),
            }
        }
    }
}
