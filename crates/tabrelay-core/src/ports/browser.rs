//! TabHost port - ブラウザのタブ操作

use async_trait::async_trait;

use crate::domain::{HandoffError, TabId, TabInfo};

#[async_trait]
pub trait TabHost: Send + Sync {
    /// Active tab of the current window, if any.
    async fn active_tab(&self) -> Result<Option<TabInfo>, HandoffError>;

    /// Open `url` in a new tab, foreground when `activate` is set.
    async fn open_tab(&self, url: &str, activate: bool) -> Result<TabInfo, HandoffError>;

    async fn get_tab(&self, id: TabId) -> Result<Option<TabInfo>, HandoffError>;

    /// Bring `id` and its window to the front.
    async fn focus_tab(&self, id: TabId) -> Result<(), HandoffError>;
}
