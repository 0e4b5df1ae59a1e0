//! Acknowledgement classification.
//!
//! An explicit `{ok:false}` and a channel-level delivery failure are both
//! plain failures as far as the retry driver is concerned.

use thiserror::Error;

use super::message::{Provider, SubmitResponse};

/// The message never reached a listening capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// Nothing is listening in the tab (scripts not loaded yet, or gone).
    #[error("receiving end does not exist")]
    NoReceiver,

    /// The tab closed or navigated away before answering.
    #[error("message channel closed before a response was received")]
    ChannelClosed,

    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acknowledgement {
    Accepted { provider: Option<Provider> },
    Rejected { reason: Option<String> },
    Undelivered(DeliveryError),
}

impl Acknowledgement {
    pub fn is_success(&self) -> bool {
        matches!(self, Acknowledgement::Accepted { .. })
    }

    pub fn describe(&self) -> String {
        match self {
            Acknowledgement::Accepted { .. } => "accepted".to_string(),
            Acknowledgement::Rejected { reason } => {
                format!("rejected: {}", reason.as_deref().unwrap_or("unknown"))
            }
            Acknowledgement::Undelivered(err) => format!("undelivered: {err}"),
        }
    }
}

impl From<Result<SubmitResponse, DeliveryError>> for Acknowledgement {
    fn from(result: Result<SubmitResponse, DeliveryError>) -> Self {
        match result {
            Ok(resp) if resp.ok => Acknowledgement::Accepted {
                provider: resp.provider,
            },
            Ok(resp) => Acknowledgement::Rejected {
                reason: resp.reason,
            },
            Err(err) => Acknowledgement::Undelivered(err),
        }
    }
}
