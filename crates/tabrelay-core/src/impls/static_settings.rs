use async_trait::async_trait;

use crate::domain::{HandoffError, Settings};
use crate::ports::SettingsSource;

/// Settings fixed at startup (CLI config file, tests).
#[derive(Debug, Default)]
pub struct StaticSettings {
    settings: Settings,
}

impl StaticSettings {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl SettingsSource for StaticSettings {
    async fn load(&self) -> Result<Settings, HandoffError> {
        Ok(self.settings.clone())
    }
}
