//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **InMemoryTaskStore** / **JsonFileTaskStore**: TaskStore
//! - **HostAllowlist**: UrlClassifier
//! - **TemplateRenderer**: PromptRenderer
//! - **StaticSettings**: SettingsSource
//! - **PageBridge**: RemoteSubmitter（capability をプロセス内で実行）
//! - **scripted**: テスト・デモ用のスクリプト化された外部コラボレータ

pub mod allowlist;
pub mod file_store;
pub mod memory_store;
pub mod page;
pub mod scripted;
pub mod static_settings;
pub mod template;

pub use self::allowlist::HostAllowlist;
pub use self::file_store::{JsonFileTaskStore, PENDING_KEY};
pub use self::memory_store::InMemoryTaskStore;
pub use self::page::PageBridge;
pub use self::scripted::{FakeTabs, OpenedTab, RecordingSink, ScriptedRemote, ScriptedSurface};
pub use self::static_settings::StaticSettings;
pub use self::template::TemplateRenderer;
