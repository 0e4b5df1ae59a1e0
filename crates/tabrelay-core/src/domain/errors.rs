//! Errors - エラー型と分類

use std::path::PathBuf;

use thiserror::Error;

/// Failures of the persistent task store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt store file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised while handling a trigger.
///
/// None of these escape the coordinator: they end up as a processing-error
/// notification.
#[derive(Debug, Error)]
pub enum HandoffError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("browser: {0}")]
    Browser(String),

    #[error("prompt rendering failed: {0}")]
    Prompt(String),
}
