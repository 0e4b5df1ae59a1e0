//! テスト用のワイヤリング

use std::sync::Arc;

use chrono::{TimeZone, Utc};

use super::builder::AppBuilder;
use super::coordinator::Coordinator;
use super::notifications::NotificationRouter;
use super::retry_driver::RetryDriver;
use crate::config::CoordinatorConfig;
use crate::domain::{DefaultDecider, Locale, NotificationKind, PendingTask, Settings, TabId};
use crate::impls::{FakeTabs, InMemoryTaskStore, RecordingSink, ScriptedRemote, StaticSettings};
use crate::ports::{FixedClock, TaskStore, UlidGenerator};

pub(crate) const VIDEO_URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
pub(crate) const UNSUPPORTED_URL: &str = "https://example.com/article";

pub(crate) struct Harness {
    pub store: Arc<InMemoryTaskStore>,
    pub remote: Arc<ScriptedRemote>,
    pub sink: Arc<RecordingSink>,
    pub tabs: Arc<FakeTabs>,
    pub settings: Arc<StaticSettings>,
    pub router: Arc<NotificationRouter>,
    pub clock: Arc<FixedClock>,
    pub config: CoordinatorConfig,
}

impl Harness {
    pub fn new(remote: ScriptedRemote) -> Self {
        Self::with_tabs(remote, FakeTabs::with_active(VIDEO_URL))
    }

    pub fn with_tabs(remote: ScriptedRemote, tabs: FakeTabs) -> Self {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let sink = Arc::new(RecordingSink::new());
        let tabs = Arc::new(tabs);
        let router = Arc::new(NotificationRouter::new(
            sink.clone(),
            tabs.clone(),
            Arc::new(UlidGenerator::new(FixedClock::new(start))),
        ));
        Self {
            store: Arc::new(InMemoryTaskStore::new()),
            remote: Arc::new(remote),
            sink,
            tabs,
            settings: Arc::new(StaticSettings::new(Settings::default())),
            router,
            clock: Arc::new(FixedClock::new(start)),
            config: CoordinatorConfig::default(),
        }
    }

    pub fn driver(&self) -> RetryDriver {
        RetryDriver::new(
            self.store.clone(),
            self.remote.clone(),
            self.router.clone(),
            Arc::new(DefaultDecider::new(self.config.retry_policy())),
            self.clock.clone(),
            self.config.success_notify_delay(),
        )
    }

    pub fn coordinator(&self) -> Arc<Coordinator> {
        AppBuilder::new()
            .store(self.store.clone())
            .remote(self.remote.clone())
            .tabs(self.tabs.clone())
            .sink(self.sink.clone())
            .settings(self.settings.clone())
            .clock(self.clock.clone())
            .router(self.router.clone())
            .config(self.config.clone())
            .build()
            .unwrap()
            .coordinator
    }

    /// Store a pending task for target tab `target`.
    pub async fn seed(&self, target: u64) -> PendingTask {
        let task = PendingTask::new(
            TabId::new(target),
            TabId::new(1),
            format!("Summarize {VIDEO_URL}"),
            Locale::En,
            Utc::now(),
        );
        self.store.put(TabId::new(target), task.clone()).await.unwrap();
        task
    }

    pub fn kinds(&self) -> Vec<NotificationKind> {
        self.sink.shown().into_iter().map(|n| n.kind).collect()
    }
}
