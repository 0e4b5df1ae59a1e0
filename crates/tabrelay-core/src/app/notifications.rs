//! NotificationRouter - 通知の表示と「タブへ移動」ボタンの処理
//!
//! Owns the `notification id -> target tab` side table. An entry is added
//! when a notification names a target tab and removed on either button or on
//! close.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::{Locale, Notification, NotificationId, NotificationKind, TabId};
use crate::ports::{IdGenerator, NotificationSink, Notifier, TabHost};

pub const BUTTON_OK: usize = 0;
pub const BUTTON_GO_TO_TAB: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    Dismissed,
    Focused(TabId),
    /// The target tab no longer exists or could not be focused.
    TabGone(TabId),
    Ignored,
}

pub struct NotificationRouter {
    sink: Arc<dyn NotificationSink>,
    tabs: Arc<dyn TabHost>,
    ids: Arc<dyn IdGenerator>,
    targets: Mutex<HashMap<NotificationId, TabId>>,
}

impl NotificationRouter {
    pub fn new(
        sink: Arc<dyn NotificationSink>,
        tabs: Arc<dyn TabHost>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            sink,
            tabs,
            ids,
            targets: Mutex::new(HashMap::new()),
        }
    }

    fn targets(&self) -> MutexGuard<'_, HashMap<NotificationId, TabId>> {
        self.targets.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn target_of(&self, id: NotificationId) -> Option<TabId> {
        self.targets().get(&id).copied()
    }

    /// Number of notifications still associated with a tab.
    pub fn tracked(&self) -> usize {
        self.targets().len()
    }

    pub async fn on_button_clicked(&self, id: NotificationId, button: usize) -> ButtonAction {
        let action = match button {
            BUTTON_OK => ButtonAction::Dismissed,
            BUTTON_GO_TO_TAB => match self.target_of(id) {
                Some(tab) => self.focus(tab).await,
                None => ButtonAction::Dismissed,
            },
            _ => return ButtonAction::Ignored,
        };
        self.sink.clear(id).await;
        self.targets().remove(&id);
        action
    }

    pub fn on_closed(&self, id: NotificationId) {
        self.targets().remove(&id);
    }

    async fn focus(&self, tab: TabId) -> ButtonAction {
        match self.tabs.get_tab(tab).await {
            Ok(Some(_)) => {}
            Ok(None) => return ButtonAction::TabGone(tab),
            Err(err) => {
                debug!(tab_id = %tab, error = %err, "tab lookup failed");
                return ButtonAction::TabGone(tab);
            }
        }
        match self.tabs.focus_tab(tab).await {
            Ok(()) => ButtonAction::Focused(tab),
            Err(err) => {
                debug!(tab_id = %tab, error = %err, "could not focus tab");
                ButtonAction::TabGone(tab)
            }
        }
    }
}

#[async_trait]
impl Notifier for NotificationRouter {
    async fn notify(
        &self,
        locale: Locale,
        kind: NotificationKind,
        target_tab: Option<TabId>,
    ) -> NotificationId {
        let id = self.ids.generate_notification_id();
        if let Some(tab) = target_tab {
            self.targets().insert(id, tab);
        }

        let notification = Notification::render(id, locale, kind, target_tab);
        debug!(
            notification_id = %id,
            kind = ?notification.kind,
            locale = locale.code(),
            "showing notification"
        );
        if let Err(err) = self.sink.show(&notification).await {
            warn!(notification_id = %id, error = %err, "notification could not be shown");
            self.targets().remove(&id);
        }
        id
    }
}
