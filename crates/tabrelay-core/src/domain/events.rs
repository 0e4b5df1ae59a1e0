//! Events - ブラウザから届くイベント

use serde::{Deserialize, Serialize};

use super::ids::{NotificationId, TabId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabStatus {
    Loading,
    Complete,
}

/// Snapshot of a browser tab.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TabInfo {
    pub id: Option<TabId>,
    pub url: Option<String>,
}

impl TabInfo {
    pub fn new(id: TabId, url: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            url: Some(url.into()),
        }
    }
}

/// Everything the event loop reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserEvent {
    /// Keyboard shortcut or other named command.
    Command { name: String },

    TabUpdated {
        tab_id: TabId,
        status: TabStatus,
        url: Option<String>,
    },

    TabRemoved { tab_id: TabId },

    NotificationButton {
        notification_id: NotificationId,
        button: usize,
    },

    NotificationClosed { notification_id: NotificationId },
}
