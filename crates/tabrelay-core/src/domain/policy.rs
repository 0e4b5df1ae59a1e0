//! Retry policy: bounded attempts at a fixed interval.

use std::time::Duration;

/// Retry policy for remote submit attempts.
///
/// Attempts are numbered from 0. Attempt `n` may be followed by another one
/// while `n < max_retry`, so a task gets at most `max_retry + 1` attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retry: u32,

    /// Fixed delay between attempts (not exponential).
    pub interval: Duration,
}

impl RetryPolicy {
    pub const DEFAULT_MAX_RETRY: u32 = 8;
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1000);

    pub fn new(max_retry: u32, interval: Duration) -> Self {
        Self {
            max_retry,
            interval,
        }
    }

    pub fn allows_retry(&self, attempt: u32) -> bool {
        attempt < self.max_retry
    }

    /// Delay before the attempt following `attempt`. Constant by construction.
    pub fn next_delay(&self, _attempt: u32) -> Duration {
        self.interval
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retry.saturating_add(1)
    }

    /// Worst-case time from the first attempt to the last one.
    pub fn worst_case_span(&self) -> Duration {
        self.interval.saturating_mul(self.max_retry)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_RETRY, Self::DEFAULT_INTERVAL)
    }
}
