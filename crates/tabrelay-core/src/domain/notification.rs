//! Terminal notifications shown to the user.

use serde::{Deserialize, Serialize};

use super::ids::{NotificationId, TabId};
use super::locale::{Locale, MessageKey, format_message, message};

/// What a notification reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NotificationKind {
    /// Trigger on a page that is not a supported video source.
    Unsupported,
    /// Retries exhausted; the user has to paste the prompt manually.
    AutoSubmitFailed,
    Submitted,
    ProcessingError { message: String },
}

impl NotificationKind {
    pub fn title_key(&self) -> MessageKey {
        match self {
            NotificationKind::Submitted => MessageKey::SummaryDoneTitle,
            _ => MessageKey::AppTitle,
        }
    }

    pub fn body(&self, locale: Locale) -> String {
        match self {
            NotificationKind::Unsupported => message(locale, MessageKey::UnsupportedUrl).into(),
            NotificationKind::AutoSubmitFailed => {
                message(locale, MessageKey::AutoSubmitFailed).into()
            }
            NotificationKind::Submitted => message(locale, MessageKey::Submitted).into(),
            NotificationKind::ProcessingError { message } => format_message(
                locale,
                MessageKey::ProcessingError,
                &[("error", message.as_str())],
            ),
        }
    }
}

/// A notification ready to hand to the display sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub locale: Locale,
    /// Tab the "go to tab" button focuses, if any.
    pub target_tab: Option<TabId>,
    pub title: String,
    pub message: String,
    /// Index 0 dismisses, index 1 focuses `target_tab`.
    pub buttons: [String; 2],
}

impl Notification {
    pub fn render(
        id: NotificationId,
        locale: Locale,
        kind: NotificationKind,
        target_tab: Option<TabId>,
    ) -> Self {
        Self {
            id,
            title: message(locale, kind.title_key()).to_string(),
            message: kind.body(locale),
            buttons: [
                message(locale, MessageKey::ButtonOk).to_string(),
                message(locale, MessageKey::ButtonMove).to_string(),
            ],
            kind,
            locale,
            target_tab,
        }
    }
}
