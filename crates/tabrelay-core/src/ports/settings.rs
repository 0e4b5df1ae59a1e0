use async_trait::async_trait;

use crate::domain::{HandoffError, Settings};

/// Source of user settings, read fresh on every trigger.
#[async_trait]
pub trait SettingsSource: Send + Sync {
    async fn load(&self) -> Result<Settings, HandoffError>;
}
