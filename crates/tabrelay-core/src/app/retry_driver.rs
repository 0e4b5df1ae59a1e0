//! RetryDriver - 1 件の pending task を remote capability に届ける
//!
//! # フロー（attempt ごと）
//! 1. TaskStore で task がまだ存在するか確認（タブが閉じられていれば中断）
//! 2. RemoteSubmitter に 1 回だけ送信
//! 3. 成功: submitted を記録 → 成功通知を遅延スケジュール → task 削除
//! 4. 失敗: Decider が Retry（固定間隔）か Escalate（失敗通知 + 削除）を決める
//!
//! 呼び出し側にエラーは返さない。どの経路も通知か静かな中断で終わる。

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::domain::{
    Decider, Decision, DriveOutcome, Locale, NotificationKind, PendingTask, TabId, TaskPatch,
};
use crate::ports::{Clock, Notifier, RemoteSubmitter, TaskStore};
use crate::protocol::{Acknowledgement, DeliveryError, RemoteRequest};

pub struct RetryDriver {
    store: Arc<dyn TaskStore>,
    remote: Arc<dyn RemoteSubmitter>,
    notifier: Arc<dyn Notifier>,
    decider: Arc<dyn Decider>,
    clock: Arc<dyn Clock>,
    success_notify_delay: Duration,
}

/// What the pre-send existence check found.
enum Presence {
    Pending,
    Gone,
    Unknown(String),
}

impl RetryDriver {
    pub fn new(
        store: Arc<dyn TaskStore>,
        remote: Arc<dyn RemoteSubmitter>,
        notifier: Arc<dyn Notifier>,
        decider: Arc<dyn Decider>,
        clock: Arc<dyn Clock>,
        success_notify_delay: Duration,
    ) -> Self {
        Self {
            store,
            remote,
            notifier,
            decider,
            clock,
            success_notify_delay,
        }
    }

    /// Drive `task` to a terminal outcome, starting at attempt `attempt`.
    #[tracing::instrument(name = "drive", skip(self, task), fields(tab_id = %tab_id))]
    pub async fn attempt_submit(
        &self,
        tab_id: TabId,
        task: &PendingTask,
        attempt: u32,
    ) -> DriveOutcome {
        let mut attempt = attempt;
        loop {
            let ack: Acknowledgement = match self.presence(tab_id).await {
                Presence::Gone => {
                    debug!(attempt, "task no longer pending, abandoning");
                    return DriveOutcome::Abandoned { attempt };
                }
                Presence::Unknown(err) => Acknowledgement::Undelivered(DeliveryError::Other(
                    format!("task store unavailable: {err}"),
                )),
                Presence::Pending => {
                    debug!(attempt, "sending prompt to target tab");
                    let request = RemoteRequest::submit(task.prompt_text.as_str());
                    self.remote.submit(tab_id, request).await.into()
                }
            };

            if ack.is_success() {
                return self.complete(tab_id, task.locale, attempt).await;
            }

            match self.decider.decide(attempt, &ack) {
                Decision::Retry {
                    delay,
                    next_attempt,
                    reason,
                } => {
                    debug!(attempt, %reason, "retry scheduled");
                    tokio::time::sleep(delay).await;
                    attempt = next_attempt;
                }
                Decision::Escalate { reason } => {
                    return self.escalate(tab_id, task.locale, attempt, &reason).await;
                }
            }
        }
    }

    async fn presence(&self, tab_id: TabId) -> Presence {
        match self.store.get(tab_id).await {
            Ok(Some(task)) if !task.submitted => Presence::Pending,
            Ok(_) => Presence::Gone,
            Err(err) => {
                warn!(error = %err, "could not read pending task");
                Presence::Unknown(err.to_string())
            }
        }
    }

    async fn complete(&self, tab_id: TabId, locale: Locale, attempt: u32) -> DriveOutcome {
        let patch = TaskPatch::submitted_at(self.clock.now());
        match self.store.patch(tab_id, patch).await {
            Ok(true) => {}
            Ok(false) => {
                // Tab closed while the request was in flight.
                debug!(attempt, "task removed before acknowledgement, discarding");
                return DriveOutcome::Abandoned { attempt };
            }
            Err(err) => warn!(error = %err, "could not record submission"),
        }

        info!(attempt, "prompt submitted");
        self.schedule_success_notification(tab_id, locale);
        self.cleanup(tab_id).await;
        DriveOutcome::Submitted {
            attempts: attempt + 1,
        }
    }

    /// Detached timer: never blocks store operations for this or other tabs.
    fn schedule_success_notification(&self, tab_id: TabId, locale: Locale) {
        let notifier = Arc::clone(&self.notifier);
        let delay = self.success_notify_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            notifier
                .notify(locale, NotificationKind::Submitted, Some(tab_id))
                .await;
        });
    }

    async fn escalate(
        &self,
        tab_id: TabId,
        locale: Locale,
        attempt: u32,
        reason: &str,
    ) -> DriveOutcome {
        if let Ok(None) = self.store.get(tab_id).await {
            debug!(attempt, "task removed during last attempt, nothing to report");
            return DriveOutcome::Abandoned { attempt };
        }

        warn!(attempt, %reason, "auto-submit failed, falling back to manual paste");
        self.notifier
            .notify(locale, NotificationKind::AutoSubmitFailed, Some(tab_id))
            .await;
        self.cleanup(tab_id).await;
        DriveOutcome::Exhausted {
            attempts: attempt + 1,
        }
    }

    async fn cleanup(&self, tab_id: TabId) {
        if let Err(err) = self.store.delete(tab_id).await {
            warn!(error = %err, "could not delete pending task");
        }
    }
}
