//! Coordinator tuning knobs.
//!
//! The reference values (8 retries, 1s apart, success notice after 3s) are
//! not tied to any measured UI latency; they only need to be bounded and
//! positive.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::RetryPolicy;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Retries after the first attempt.
    pub max_retry: u32,
    pub retry_interval_ms: u64,
    /// Delay between a confirmed submit and the success notification.
    pub success_notify_delay_ms: u64,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            max_retry: RetryPolicy::DEFAULT_MAX_RETRY,
            retry_interval_ms: RetryPolicy::DEFAULT_INTERVAL.as_millis() as u64,
            success_notify_delay_ms: 3000,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("retry_interval_ms must be greater than zero")]
    ZeroRetryInterval,
}

impl CoordinatorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retry_interval_ms == 0 {
            return Err(ConfigError::ZeroRetryInterval);
        }
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retry, Duration::from_millis(self.retry_interval_ms))
    }

    pub fn success_notify_delay(&self) -> Duration {
        Duration::from_millis(self.success_notify_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_policy() {
        let config = CoordinatorConfig::default();
        assert_eq!(config.retry_policy(), RetryPolicy::default());
        assert_eq!(config.success_notify_delay(), Duration::from_secs(3));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let config: CoordinatorConfig =
            serde_json::from_str(r#"{"max_retry": 2}"#).unwrap();
        assert_eq!(config.max_retry, 2);
        assert_eq!(config.retry_interval_ms, 1000);
    }

    #[test]
    fn zero_interval_is_rejected() {
        let config = CoordinatorConfig {
            retry_interval_ms: 0,
            ..CoordinatorConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroRetryInterval));
    }
}
