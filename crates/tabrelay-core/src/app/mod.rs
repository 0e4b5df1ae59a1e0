//! App - アプリケーション層
//!
//! このモジュールは、ports を組み合わせてアプリケーションロジックを実装します。
//!
//! # 主要コンポーネント
//! - **AppBuilder**: アプリケーションの構築とワイヤリング
//! - **Coordinator**: trigger → pending task → readiness → 削除のライフサイクル
//! - **RetryDriver**: 固定間隔・上限付きの送信リトライ
//! - **NotificationRouter**: 通知の表示と「タブへ移動」
//! - **EventLoop**: ブラウザイベントの配送

pub mod builder;
pub mod coordinator;
pub mod event_loop;
pub mod notifications;
pub mod retry_driver;

#[cfg(test)]
pub(crate) mod testkit;

// 主要な型を再エクスポート
pub use self::builder::{App, AppBuilder, BuildError};
pub use self::coordinator::{Coordinator, SUMMARY_COMMAND, TriggerOutcome};
pub use self::event_loop::{EventLoop, dispatch, watch_drive};
pub use self::notifications::{BUTTON_GO_TO_TAB, BUTTON_OK, ButtonAction, NotificationRouter};
pub use self::retry_driver::RetryDriver;
