//! PageBridge - in-process stand-in for the browser's tab messaging.
//!
//! Each tab may have a capability attached (the page's content script).
//! Sending to a tab without one fails at the channel level, exactly like a
//! page that has not loaded its scripts yet.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::TabId;
use crate::ports::RemoteSubmitter;
use crate::protocol::{
    CapabilityTiming, ComposerSurface, DeliveryError, RemoteRequest, SubmitResponse,
    run_capability,
};

pub struct PageBridge {
    surfaces: RwLock<HashMap<TabId, Arc<dyn ComposerSurface>>>,
    timing: CapabilityTiming,
}

impl PageBridge {
    pub fn new(timing: CapabilityTiming) -> Self {
        Self {
            surfaces: RwLock::new(HashMap::new()),
            timing,
        }
    }

    /// The capability in `tab` starts listening.
    pub async fn attach(&self, tab: TabId, surface: Arc<dyn ComposerSurface>) {
        self.surfaces.write().await.insert(tab, surface);
    }

    /// The tab navigated away or closed.
    pub async fn detach(&self, tab: TabId) {
        self.surfaces.write().await.remove(&tab);
    }

    async fn surface(&self, tab: TabId) -> Option<Arc<dyn ComposerSurface>> {
        self.surfaces.read().await.get(&tab).cloned()
    }
}

impl Default for PageBridge {
    fn default() -> Self {
        Self::new(CapabilityTiming::default())
    }
}

#[async_trait]
impl RemoteSubmitter for PageBridge {
    async fn submit(
        &self,
        tab: TabId,
        request: RemoteRequest,
    ) -> Result<SubmitResponse, DeliveryError> {
        let Some(surface) = self.surface(tab).await else {
            return Err(DeliveryError::NoReceiver);
        };

        let response = run_capability(surface.as_ref(), request.prompt_text(), &self.timing).await;

        // A response from a page that went away never reaches the caller.
        match self.surface(tab).await {
            Some(current) if Arc::ptr_eq(&current, &surface) => Ok(response),
            _ => Err(DeliveryError::ChannelClosed),
        }
    }
}
