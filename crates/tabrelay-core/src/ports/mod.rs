//! Ports - 抽象化レイヤー
//!
//! このモジュールは Hexagonal Architecture の「ポート」を定義します。
//! 各 trait はブラウザ・永続化・通知 UI などの外部コラボレータへの
//! インターフェースを提供し、実装の詳細を隠蔽します。

pub mod browser;
pub mod classifier;
pub mod clock;
pub mod id_generator;
pub mod notifier;
pub mod prompt;
pub mod remote;
pub mod settings;
pub mod task_store;

// 主要な trait を再エクスポート
pub use self::browser::TabHost;
pub use self::classifier::UrlClassifier;
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::notifier::{NotificationSink, Notifier};
pub use self::prompt::PromptRenderer;
pub use self::remote::RemoteSubmitter;
pub use self::settings::SettingsSource;
pub use self::task_store::TaskStore;
