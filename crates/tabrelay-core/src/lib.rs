//! tabrelay-core
//!
//! 動画ページのタブからチャットアシスタントのタブへプロンプトを一度だけ届けるための
//! pending-task コーディネータ。
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, task, settings, locale, policy, decision, state, errors, events）
//! - **ports**: 抽象化レイヤー（TaskStore, RemoteSubmitter, TabHost, Notifier, Clock, など）
//! - **protocol**: リモート確認応答プロトコル（メッセージ、ack、送信 capability）
//! - **app**: アプリケーションロジック（builder, coordinator, retry_driver, notifications, event_loop）
//! - **impls**: 実装（InMemoryTaskStore, JsonFileTaskStore, HostAllowlist, など）
//! - **config**: リトライ間隔などの調整値

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod ports;
pub mod protocol;

pub use app::{App, AppBuilder, Coordinator, EventLoop, NotificationRouter};
pub use config::{ConfigError, CoordinatorConfig};
