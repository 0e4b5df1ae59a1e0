//! Notification ports.
//!
//! - `Notifier`: what the coordinator and driver call (`notify(locale, kind, tab?)`)
//! - `NotificationSink`: the actual display surface (OS toast, console, ...)

use async_trait::async_trait;

use crate::domain::{HandoffError, Locale, Notification, NotificationId, NotificationKind, TabId};

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(
        &self,
        locale: Locale,
        kind: NotificationKind,
        target_tab: Option<TabId>,
    ) -> NotificationId;
}

#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn show(&self, notification: &Notification) -> Result<(), HandoffError>;

    async fn clear(&self, id: NotificationId);
}
