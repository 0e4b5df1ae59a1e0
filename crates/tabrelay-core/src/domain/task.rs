//! Pending task record: one outstanding prompt handoff per target tab.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::TabId;
use super::locale::Locale;

/// A prompt waiting to be typed into and submitted by a target tab.
///
/// Persisted as one entry of the flat `tab id -> task` map. Field names are
/// camelCase on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingTask {
    pub target_tab_id: TabId,

    /// Tab the user triggered the action from ("return to source").
    pub source_tab_id: TabId,

    /// Fully rendered prompt. Opaque here.
    pub prompt_text: String,

    #[serde(default)]
    pub locale: Locale,

    /// Diagnostics only; tasks do not expire by age.
    pub created_at: DateTime<Utc>,

    /// false until the remote capability reports success. Never reset.
    #[serde(default)]
    pub submitted: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
}

impl PendingTask {
    pub fn new(
        target_tab_id: TabId,
        source_tab_id: TabId,
        prompt_text: impl Into<String>,
        locale: Locale,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            target_tab_id,
            source_tab_id,
            prompt_text: prompt_text.into(),
            locale,
            created_at,
            submitted: false,
            submitted_at: None,
        }
    }

    /// Merge a partial update.
    ///
    /// `submitted` only moves false -> true. `submitted_at` is written once,
    /// and only on a record that is (or just became) submitted.
    pub fn apply(&mut self, patch: &TaskPatch) {
        if patch.submitted == Some(true) {
            self.submitted = true;
        }
        if self.submitted && self.submitted_at.is_none() {
            self.submitted_at = patch.submitted_at;
        }
    }
}

/// Partial update for [`PendingTask`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub submitted: Option<bool>,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl TaskPatch {
    pub fn submitted_at(at: DateTime<Utc>) -> Self {
        Self {
            submitted: Some(true),
            submitted_at: Some(at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> PendingTask {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        PendingTask::new(TabId::new(9), TabId::new(3), "summarize", Locale::En, at)
    }

    #[test]
    fn submitted_is_monotonic() {
        let mut task = sample();
        let first = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 5).unwrap();
        task.apply(&TaskPatch::submitted_at(first));
        assert!(task.submitted);

        task.apply(&TaskPatch {
            submitted: Some(false),
            submitted_at: Some(Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()),
        });
        assert!(task.submitted);
        assert_eq!(task.submitted_at, Some(first));
    }

    #[test]
    fn submitted_at_needs_submitted() {
        let mut task = sample();
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 5).unwrap();
        task.apply(&TaskPatch {
            submitted: None,
            submitted_at: Some(at),
        });
        assert!(!task.submitted);
        assert_eq!(task.submitted_at, None);

        task.apply(&TaskPatch::submitted_at(at));
        assert_eq!(task.submitted_at, Some(at));
    }

    #[test]
    fn persisted_shape_is_camel_case() {
        let v = serde_json::to_value(sample()).unwrap();
        assert_eq!(v["targetTabId"], 9);
        assert_eq!(v["sourceTabId"], 3);
        assert_eq!(v["promptText"], "summarize");
        assert_eq!(v["locale"], "en");
        assert_eq!(v["submitted"], false);
        assert!(v.get("submittedAt").is_none());
    }
}
