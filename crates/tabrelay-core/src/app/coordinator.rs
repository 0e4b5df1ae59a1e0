//! Coordinator - trigger からタスク作成、readiness 監視、削除までのライフサイクル
//!
//! # 状態遷移（target tab ごと）
//! - trigger（対応 URL）→ target tab を開き PENDING を保存
//! - trigger（非対応 / アクティブタブなし）→ Unsupported 通知のみ
//! - navigation complete（target URL かつ PENDING）→ RetryDriver を attempt 0 で起動
//! - tab removed → 無条件に削除（進行中の retry より優先）
//! - trigger 処理中の想定外エラー → ProcessingError 通知、task は残さない

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::retry_driver::RetryDriver;
use crate::domain::{
    DriveOutcome, HandoffError, HandoffState, NotificationKind, PendingTask, TabId, TabInfo,
    TabStatus,
};
use crate::ports::{
    Clock, Notifier, PromptRenderer, SettingsSource, TabHost, TaskStore, UrlClassifier,
};

/// Command name bound to the keyboard shortcut.
pub const SUMMARY_COMMAND: &str = "open_gemini_summary";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// A pending task was stored for the newly opened target tab.
    Created { target: TabId },
    /// Source page not supported; user notified, nothing stored.
    Unsupported,
    /// Unexpected error; user notified with the message, nothing stored.
    Failed { message: String },
    /// Not our command.
    Ignored,
}

type InFlight = Arc<Mutex<HashSet<TabId>>>;

fn lock(set: &InFlight) -> MutexGuard<'_, HashSet<TabId>> {
    set.lock().unwrap_or_else(|e| e.into_inner())
}

/// Removes the tab from the in-flight set when the drive ends.
struct InFlightGuard {
    set: InFlight,
    tab_id: TabId,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        lock(&self.set).remove(&self.tab_id);
    }
}

pub struct Coordinator {
    pub(crate) store: Arc<dyn TaskStore>,
    pub(crate) tabs: Arc<dyn TabHost>,
    pub(crate) classifier: Arc<dyn UrlClassifier>,
    pub(crate) renderer: Arc<dyn PromptRenderer>,
    pub(crate) settings: Arc<dyn SettingsSource>,
    pub(crate) notifier: Arc<dyn Notifier>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) driver: Arc<RetryDriver>,
    pub(crate) in_flight: InFlight,
}

impl Coordinator {
    /// Entry point for named commands. Only [`SUMMARY_COMMAND`] is handled.
    pub async fn handle_command(&self, name: &str) -> TriggerOutcome {
        if name != SUMMARY_COMMAND {
            debug!(command = name, "ignoring unknown command");
            return TriggerOutcome::Ignored;
        }
        match self.tabs.active_tab().await {
            Ok(source) => self.handle_trigger(source).await,
            Err(err) => self.report_failure(err).await,
        }
    }

    /// Create a pending task for `source`, or notify why not.
    pub async fn handle_trigger(&self, source: Option<TabInfo>) -> TriggerOutcome {
        match self.try_trigger(source).await {
            Ok(outcome) => outcome,
            Err(err) => self.report_failure(err).await,
        }
    }

    async fn try_trigger(&self, source: Option<TabInfo>) -> Result<TriggerOutcome, HandoffError> {
        let settings = self.settings.load().await?;
        let locale = settings.locale();
        let source = source.unwrap_or_default();

        let video_url = source
            .url
            .as_deref()
            .filter(|url| self.classifier.is_source(url));
        let (Some(source_tab_id), Some(video_url)) = (source.id, video_url) else {
            info!(url = ?source.url, "trigger on unsupported page");
            self.notifier
                .notify(locale, NotificationKind::Unsupported, None)
                .await;
            return Ok(TriggerOutcome::Unsupported);
        };

        let target_url = settings.ai_target.app_url();
        if !self.classifier.is_target(target_url) {
            return Err(HandoffError::Browser(format!(
                "target url is not a supported chat application: {target_url}"
            )));
        }

        let prompt = self.renderer.render(video_url, &settings)?;
        let tab = self
            .tabs
            .open_tab(target_url, settings.open_page_immediately)
            .await?;
        let target = tab
            .id
            .ok_or_else(|| HandoffError::Browser("opened tab has no id".into()))?;

        let task = PendingTask::new(target, source_tab_id, prompt, locale, self.clock.now());
        self.store.put(target, task).await?;
        info!(tab_id = %target, source_tab_id = %source_tab_id, "pending task stored");
        Ok(TriggerOutcome::Created { target })
    }

    async fn report_failure(&self, err: HandoffError) -> TriggerOutcome {
        warn!(error = %err, "trigger failed");
        let locale = match self.settings.load().await {
            Ok(settings) => settings.locale(),
            Err(_) => Default::default(),
        };
        let message = err.to_string();
        self.notifier
            .notify(
                locale,
                NotificationKind::ProcessingError {
                    message: message.clone(),
                },
                None,
            )
            .await;
        TriggerOutcome::Failed { message }
    }

    /// Tab update. Starts a drive when a pending target tab finished loading.
    ///
    /// Returns the drive's handle, or `None` when the update is a no-op
    /// (still loading, foreign URL, no task, already submitted, or a drive for
    /// this tab is already running).
    pub async fn on_tab_updated(
        &self,
        tab_id: TabId,
        status: TabStatus,
        url: Option<&str>,
    ) -> Option<JoinHandle<DriveOutcome>> {
        if status != TabStatus::Complete {
            return None;
        }
        url.filter(|u| self.classifier.is_target(u))?;

        let task = match self.store.get(tab_id).await {
            Ok(task) => task,
            Err(err) => {
                warn!(tab_id = %tab_id, error = %err, "could not read pending task");
                return None;
            }
        };
        if !HandoffState::of(task.as_ref()).accepts_readiness() {
            return None;
        }
        let task = task?;

        if !lock(&self.in_flight).insert(tab_id) {
            debug!(tab_id = %tab_id, "drive already in flight, ignoring readiness");
            return None;
        }
        let guard = InFlightGuard {
            set: Arc::clone(&self.in_flight),
            tab_id,
        };

        info!(tab_id = %tab_id, "target tab ready, starting auto-submit");
        let driver = Arc::clone(&self.driver);
        Some(tokio::spawn(async move {
            let _guard = guard;
            driver.attempt_submit(tab_id, &task, 0).await
        }))
    }

    /// Tab closed: drop its task whatever state the drive is in.
    pub async fn on_tab_removed(&self, tab_id: TabId) -> bool {
        match self.store.delete(tab_id).await {
            Ok(removed) => {
                if removed {
                    info!(tab_id = %tab_id, "target tab closed, pending task removed");
                }
                removed
            }
            Err(err) => {
                warn!(tab_id = %tab_id, error = %err, "could not remove pending task");
                false
            }
        }
    }

    pub fn is_driving(&self, tab_id: TabId) -> bool {
        lock(&self.in_flight).contains(&tab_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testkit::{Harness, UNSUPPORTED_URL, VIDEO_URL};
    use crate::domain::Locale;
    use crate::impls::{FakeTabs, ScriptedRemote};
    use std::time::Duration;

    const GEMINI: &str = "https://gemini.google.com/app";

    #[tokio::test(start_paused = true)]
    async fn trigger_on_video_opens_background_tab_and_stores_task() {
        let h = Harness::new(ScriptedRemote::always_ok());
        let coordinator = h.coordinator();

        let outcome = coordinator.handle_command(SUMMARY_COMMAND).await;

        let TriggerOutcome::Created { target } = outcome else {
            panic!("expected task creation, got {outcome:?}");
        };
        let opened = h.tabs.opened();
        assert_eq!(opened.len(), 1);
        assert_eq!(opened[0].url, GEMINI);
        assert!(!opened[0].active);

        let task = h.store.get(target).await.unwrap().unwrap();
        assert_eq!(task.source_tab_id, TabId::new(1));
        assert!(task.prompt_text.contains(VIDEO_URL));
        assert!(!task.submitted);
        assert_eq!(task.locale, Locale::En);
    }

    #[tokio::test(start_paused = true)]
    async fn unsupported_source_notifies_without_tab_or_task() {
        let h = Harness::with_tabs(
            ScriptedRemote::always_ok(),
            FakeTabs::with_active(UNSUPPORTED_URL),
        );

        let outcome = h.coordinator().handle_command(SUMMARY_COMMAND).await;

        assert_eq!(outcome, TriggerOutcome::Unsupported);
        assert!(h.tabs.opened().is_empty());
        assert!(h.store.list().await.unwrap().is_empty());
        assert_eq!(h.kinds(), vec![NotificationKind::Unsupported]);
        assert_eq!(h.sink.shown()[0].target_tab, None);
    }

    #[tokio::test(start_paused = true)]
    async fn no_active_tab_is_unsupported() {
        let h = Harness::with_tabs(ScriptedRemote::always_ok(), FakeTabs::new());
        assert_eq!(
            h.coordinator().handle_trigger(None).await,
            TriggerOutcome::Unsupported
        );
    }

    #[tokio::test(start_paused = true)]
    async fn browser_error_becomes_processing_error() {
        let h = Harness::new(ScriptedRemote::always_ok());
        h.tabs.fail_open("window closed");

        let outcome = h.coordinator().handle_command(SUMMARY_COMMAND).await;

        assert!(matches!(outcome, TriggerOutcome::Failed { ref message } if message.contains("window closed")));
        assert!(h.store.list().await.unwrap().is_empty());
        match &h.kinds()[..] {
            [NotificationKind::ProcessingError { message }] => {
                assert!(message.contains("window closed"))
            }
            other => panic!("unexpected notifications {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn other_commands_are_ignored() {
        let h = Harness::new(ScriptedRemote::always_ok());
        assert_eq!(
            h.coordinator().handle_command("something_else").await,
            TriggerOutcome::Ignored
        );
        assert!(h.kinds().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn readiness_requires_complete_status_and_target_url() {
        let h = Harness::new(ScriptedRemote::always_ok());
        h.seed(20).await;
        let coordinator = h.coordinator();

        assert!(
            coordinator
                .on_tab_updated(TabId::new(20), TabStatus::Loading, Some(GEMINI))
                .await
                .is_none()
        );
        assert!(
            coordinator
                .on_tab_updated(TabId::new(20), TabStatus::Complete, Some(VIDEO_URL))
                .await
                .is_none()
        );
        assert!(
            coordinator
                .on_tab_updated(TabId::new(20), TabStatus::Complete, None)
                .await
                .is_none()
        );
        assert_eq!(h.remote.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn readiness_without_task_is_noop() {
        let h = Harness::new(ScriptedRemote::always_ok());
        let handle = h
            .coordinator()
            .on_tab_updated(TabId::new(404), TabStatus::Complete, Some(GEMINI))
            .await;
        assert!(handle.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn duplicate_readiness_submits_at_most_once() {
        let h = Harness::new(
            ScriptedRemote::always_ok().with_latency(Duration::from_millis(300)),
        );
        h.seed(21).await;
        let coordinator = h.coordinator();

        let first = coordinator
            .on_tab_updated(TabId::new(21), TabStatus::Complete, Some(GEMINI))
            .await
            .expect("first readiness starts a drive");
        // Fires while the first drive is still waiting on the remote.
        let second = coordinator
            .on_tab_updated(TabId::new(21), TabStatus::Complete, Some(GEMINI))
            .await;
        assert!(second.is_none());
        assert!(coordinator.is_driving(TabId::new(21)));

        assert_eq!(first.await.unwrap(), DriveOutcome::Submitted { attempts: 1 });
        assert!(!coordinator.is_driving(TabId::new(21)));

        // Late duplicate after completion: task is gone.
        assert!(
            coordinator
                .on_tab_updated(TabId::new(21), TabStatus::Complete, Some(GEMINI))
                .await
                .is_none()
        );
        assert_eq!(h.remote.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn already_submitted_task_is_not_driven() {
        let h = Harness::new(ScriptedRemote::always_ok());
        h.seed(22).await;
        h.store
            .patch(TabId::new(22), crate::domain::TaskPatch::submitted_at(h.clock.now()))
            .await
            .unwrap();

        let handle = h
            .coordinator()
            .on_tab_updated(TabId::new(22), TabStatus::Complete, Some(GEMINI))
            .await;

        assert!(handle.is_none());
        assert_eq!(h.remote.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn removal_supersedes_running_drive() {
        let h = Harness::new(ScriptedRemote::always_failing());
        h.seed(23).await;
        let coordinator = h.coordinator();

        let drive = coordinator
            .on_tab_updated(TabId::new(23), TabStatus::Complete, Some(GEMINI))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert!(coordinator.on_tab_removed(TabId::new(23)).await);

        assert_eq!(drive.await.unwrap(), DriveOutcome::Abandoned { attempt: 3 });
        assert_eq!(h.remote.call_count(), 3);
        assert!(h.store.get(TabId::new(23)).await.unwrap().is_none());
        assert!(h.kinds().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn removing_unknown_tab_is_harmless() {
        let h = Harness::new(ScriptedRemote::always_ok());
        assert!(!h.coordinator().on_tab_removed(TabId::new(5)).await);
    }
}
