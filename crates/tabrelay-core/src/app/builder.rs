//! AppBuilder - アプリケーションの構築とワイヤリング
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）: 必須 port の欠落と不正な設定は build() で弾く
//! - 任意 port はデフォルト実装で埋める

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use super::coordinator::Coordinator;
use super::notifications::NotificationRouter;
use super::retry_driver::RetryDriver;
use crate::config::{ConfigError, CoordinatorConfig};
use crate::domain::DefaultDecider;
use crate::impls::{HostAllowlist, TemplateRenderer};
use crate::ports::{
    Clock, IdGenerator, NotificationSink, PromptRenderer, RemoteSubmitter, SettingsSource,
    SystemClock, TabHost, TaskStore, UlidGenerator, UrlClassifier,
};

/// AppBuilder はアプリケーションを構築
///
/// # 使用例
/// ```ignore
/// let app = AppBuilder::new()
///     .store(Arc::new(InMemoryTaskStore::new()))
///     .remote(remote)
///     .tabs(tabs)
///     .sink(sink)
///     .settings(settings)
///     .build()?;
/// ```
///
/// # Fail-fast 設計
/// - store / remote / tabs / settings は必須
/// - sink は router を直接渡した場合のみ省略可
/// - 不足があれば BuildError::MissingPorts にまとめて返す
#[derive(Default)]
pub struct AppBuilder {
    store: Option<Arc<dyn TaskStore>>,
    remote: Option<Arc<dyn RemoteSubmitter>>,
    tabs: Option<Arc<dyn TabHost>>,
    sink: Option<Arc<dyn NotificationSink>>,
    settings: Option<Arc<dyn SettingsSource>>,
    classifier: Option<Arc<dyn UrlClassifier>>,
    renderer: Option<Arc<dyn PromptRenderer>>,
    clock: Option<Arc<dyn Clock>>,
    ids: Option<Arc<dyn IdGenerator>>,
    router: Option<Arc<NotificationRouter>>,
    config: CoordinatorConfig,
}

/// BuildError はアプリケーション構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Missing ports: {0:?}. These collaborators are required but were not provided.")]
    MissingPorts(Vec<&'static str>),
    #[error("invalid coordinator config: {0}")]
    Config(#[from] ConfigError),
}

impl AppBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(mut self, store: Arc<dyn TaskStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn remote(mut self, remote: Arc<dyn RemoteSubmitter>) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn tabs(mut self, tabs: Arc<dyn TabHost>) -> Self {
        self.tabs = Some(tabs);
        self
    }

    pub fn sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn settings(mut self, settings: Arc<dyn SettingsSource>) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Default: [`HostAllowlist::default`].
    pub fn classifier(mut self, classifier: Arc<dyn UrlClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Default: [`TemplateRenderer`].
    pub fn renderer(mut self, renderer: Arc<dyn PromptRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Default: [`SystemClock`].
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Default: [`UlidGenerator`] over the system clock.
    pub fn id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    /// Share an existing router instead of building one from `sink`.
    pub fn router(mut self, router: Arc<NotificationRouter>) -> Self {
        self.router = Some(router);
        self
    }

    pub fn config(mut self, config: CoordinatorConfig) -> Self {
        self.config = config;
        self
    }

    /// AppBuilder を構築して App を生成
    ///
    /// # 検証
    /// - 設定値（retry_interval_ms > 0）
    /// - 必須 port が全て揃っているか
    pub fn build(self) -> Result<App, BuildError> {
        self.config.validate()?;

        let mut missing = Vec::new();
        if self.store.is_none() {
            missing.push("store");
        }
        if self.remote.is_none() {
            missing.push("remote");
        }
        if self.tabs.is_none() {
            missing.push("tabs");
        }
        if self.sink.is_none() && self.router.is_none() {
            missing.push("sink");
        }
        if self.settings.is_none() {
            missing.push("settings");
        }
        let (Some(store), Some(remote), Some(tabs), Some(settings)) =
            (self.store, self.remote, self.tabs, self.settings)
        else {
            return Err(BuildError::MissingPorts(missing));
        };
        let router = match (self.router, self.sink) {
            (Some(router), _) => router,
            (None, Some(sink)) => {
                let ids: Arc<dyn IdGenerator> = match self.ids {
                    Some(ids) => ids,
                    None => Arc::new(UlidGenerator::new(SystemClock)),
                };
                Arc::new(NotificationRouter::new(sink, Arc::clone(&tabs), ids))
            }
            (None, None) => return Err(BuildError::MissingPorts(missing)),
        };

        let clock: Arc<dyn Clock> = match self.clock {
            Some(clock) => clock,
            None => Arc::new(SystemClock),
        };
        let classifier: Arc<dyn UrlClassifier> = match self.classifier {
            Some(classifier) => classifier,
            None => Arc::new(HostAllowlist::default()),
        };
        let renderer: Arc<dyn PromptRenderer> = match self.renderer {
            Some(renderer) => renderer,
            None => Arc::new(TemplateRenderer),
        };
        let driver = Arc::new(RetryDriver::new(
            Arc::clone(&store),
            remote,
            router.clone(),
            Arc::new(DefaultDecider::new(self.config.retry_policy())),
            Arc::clone(&clock),
            self.config.success_notify_delay(),
        ));

        let coordinator = Arc::new(Coordinator {
            store,
            tabs,
            classifier,
            renderer,
            settings,
            notifier: router.clone(),
            clock,
            driver,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        });

        Ok(App {
            coordinator,
            router,
            config: self.config,
        })
    }
}

/// App は組み上がったコーディネータ一式
///
/// EventLoop に渡すか、テストから直接 Coordinator を叩く。
pub struct App {
    pub coordinator: Arc<Coordinator>,
    pub router: Arc<NotificationRouter>,
    pub config: CoordinatorConfig,
}
