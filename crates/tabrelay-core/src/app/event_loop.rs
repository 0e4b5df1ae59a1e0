//! EventLoop - ブラウザイベントを Coordinator / NotificationRouter に配る
//!
//! - イベントは受信順に 1 件ずつ dispatch する（同じタブのイベント順を保つ）
//! - RetryDriver の駆動は spawn 済みなのでループを塞がない
//! - `shutdown_tx` に true を送るとループが止まる（進行中の drive は止めない）

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::coordinator::Coordinator;
use super::notifications::NotificationRouter;
use crate::domain::{BrowserEvent, DriveOutcome, TabId};

pub struct EventLoop {
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl EventLoop {
    pub fn spawn(
        coordinator: Arc<Coordinator>,
        router: Arc<NotificationRouter>,
        events: mpsc::Receiver<BrowserEvent>,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let join = tokio::spawn(run(coordinator, router, events, shutdown_rx));
        Self { shutdown_tx, join }
    }

    /// Stop taking new events. Drives already started keep running.
    pub fn request_shutdown(&self) {
        // ignore send error: the loop may already have exited
        let _ = self.shutdown_tx.send(true);
    }

    pub async fn shutdown_and_join(self) {
        self.request_shutdown();
        let _ = self.join.await;
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}

async fn run(
    coordinator: Arc<Coordinator>,
    router: Arc<NotificationRouter>,
    mut events: mpsc::Receiver<BrowserEvent>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        let event = tokio::select! {
            changed = shutdown_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                continue;
            }
            event = events.recv() => event,
        };

        let Some(event) = event else {
            debug!("event channel closed");
            break;
        };
        dispatch(&coordinator, &router, event).await;
    }
    info!("event loop stopped");
}

/// Route one event to its handler.
pub async fn dispatch(coordinator: &Coordinator, router: &NotificationRouter, event: BrowserEvent) {
    match event {
        BrowserEvent::Command { name } => {
            let outcome = coordinator.handle_command(&name).await;
            debug!(command = %name, ?outcome, "command handled");
        }
        BrowserEvent::TabUpdated {
            tab_id,
            status,
            url,
        } => {
            if let Some(drive) = coordinator
                .on_tab_updated(tab_id, status, url.as_deref())
                .await
            {
                tokio::spawn(watch_drive(tab_id, drive));
            }
        }
        BrowserEvent::TabRemoved { tab_id } => {
            coordinator.on_tab_removed(tab_id).await;
        }
        BrowserEvent::NotificationButton {
            notification_id,
            button,
        } => {
            let action = router.on_button_clicked(notification_id, button).await;
            debug!(%notification_id, button, ?action, "notification button");
        }
        BrowserEvent::NotificationClosed { notification_id } => {
            router.on_closed(notification_id);
        }
    }
}

/// Wait for a drive and log how it ended.
pub async fn watch_drive(
    tab_id: TabId,
    drive: JoinHandle<DriveOutcome>,
) -> Option<DriveOutcome> {
    match drive.await {
        Ok(outcome) => {
            let state = outcome.state();
            if state.is_terminal() {
                info!(tab_id = %tab_id, ?outcome, ?state, "drive finished");
            } else {
                debug!(tab_id = %tab_id, ?outcome, "drive abandoned");
            }
            Some(outcome)
        }
        Err(err) => {
            warn!(tab_id = %tab_id, error = %err, "drive task did not complete");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::coordinator::SUMMARY_COMMAND;
    use crate::app::notifications::BUTTON_GO_TO_TAB;
    use crate::app::testkit::Harness;
    use crate::domain::{NotificationKind, TabStatus};
    use crate::impls::ScriptedRemote;
    use crate::ports::TaskStore;
    use std::time::Duration;

    const GEMINI: &str = "https://gemini.google.com/app";

    fn command() -> BrowserEvent {
        BrowserEvent::Command {
            name: SUMMARY_COMMAND.to_string(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn trigger_to_submitted_notification_and_focus() {
        let h = Harness::new(ScriptedRemote::always_ok());
        let (tx, rx) = mpsc::channel(16);
        h.tabs.emit_to(tx.clone());
        let event_loop = EventLoop::spawn(h.coordinator(), h.router.clone(), rx);

        tx.send(command()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(h.remote.call_count(), 1);
        assert!(h.store.list().await.unwrap().is_empty());
        assert!(h.kinds().is_empty());

        tokio::time::sleep(Duration::from_secs(3)).await;
        let shown = h.sink.shown();
        assert_eq!(h.kinds(), vec![NotificationKind::Submitted]);
        let target = shown[0].target_tab.unwrap();
        assert_eq!(target, h.tabs.opened()[0].id);

        tx.send(BrowserEvent::NotificationButton {
            notification_id: shown[0].id,
            button: BUTTON_GO_TO_TAB,
        })
        .await
        .unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(h.tabs.focused(), vec![target]);
        assert_eq!(h.router.tracked(), 0);

        event_loop.shutdown_and_join().await;
    }

    #[tokio::test(start_paused = true)]
    async fn closing_target_tab_mid_retry_stops_silently() {
        let h = Harness::new(ScriptedRemote::always_failing());
        let (tx, rx) = mpsc::channel(16);
        h.tabs.emit_to(tx.clone());
        let event_loop = EventLoop::spawn(h.coordinator(), h.router.clone(), rx);

        tx.send(command()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(h.remote.call_count(), 2);

        h.tabs.close(h.tabs.opened()[0].id);
        tokio::time::sleep(Duration::from_secs(20)).await;

        assert_eq!(h.remote.call_count(), 2);
        assert!(h.store.list().await.unwrap().is_empty());
        assert!(h.kinds().is_empty());
        event_loop.shutdown_and_join().await;
    }

    #[tokio::test(start_paused = true)]
    async fn watched_drive_reports_its_outcome() {
        let h = Harness::new(ScriptedRemote::always_failing());
        h.seed(30).await;
        let coordinator = h.coordinator();

        let drive = coordinator
            .on_tab_updated(TabId::new(30), TabStatus::Complete, Some(GEMINI))
            .await
            .unwrap();
        let outcome = watch_drive(TabId::new(30), drive).await;

        let attempts = h.config.max_retry + 1;
        assert_eq!(outcome, Some(DriveOutcome::Exhausted { attempts }));
        assert!(outcome.unwrap().state().is_terminal());
    }

    #[tokio::test(start_paused = true)]
    async fn aborted_drive_yields_no_outcome() {
        let h = Harness::new(ScriptedRemote::always_failing());
        h.seed(31).await;
        let coordinator = h.coordinator();

        let drive = coordinator
            .on_tab_updated(TabId::new(31), TabStatus::Complete, Some(GEMINI))
            .await
            .unwrap();
        drive.abort();

        assert_eq!(watch_drive(TabId::new(31), drive).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_loop_while_channel_open() {
        let h = Harness::new(ScriptedRemote::always_ok());
        let (tx, rx) = mpsc::channel::<BrowserEvent>(1);
        let event_loop = EventLoop::spawn(h.coordinator(), h.router.clone(), rx);

        event_loop.request_shutdown();
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert!(event_loop.is_finished());
        drop(tx);
    }

    #[tokio::test(start_paused = true)]
    async fn loop_exits_when_senders_drop() {
        let h = Harness::new(ScriptedRemote::always_ok());
        let (tx, rx) = mpsc::channel::<BrowserEvent>(1);
        let event_loop = EventLoop::spawn(h.coordinator(), h.router.clone(), rx);

        tx.send(BrowserEvent::TabRemoved {
            tab_id: TabId::new(9),
        })
        .await
        .unwrap();
        drop(tx);
        event_loop.join.await.unwrap();
    }
}
