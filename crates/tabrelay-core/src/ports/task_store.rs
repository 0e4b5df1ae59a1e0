//! TaskStore port - pending task の正本（source of truth）
//!
//! # 設計原則
//! - target tab ごとに最大 1 件（put は置き換え、merge しない）
//! - patch は存在しない key に対して何もしない（削除済み task の復活を防ぐ）
//! - 同一 key への操作は発行順に適用される
//! - プロセス再起動を跨いで残る実装（JsonFileTaskStore）を用意する

use async_trait::async_trait;

use crate::domain::{PendingTask, StoreError, TabId, TaskPatch};

#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Insert or fully replace the record for `id`.
    async fn put(&self, id: TabId, task: PendingTask) -> Result<(), StoreError>;

    async fn get(&self, id: TabId) -> Result<Option<PendingTask>, StoreError>;

    /// Merge `patch` into an existing record. Returns `false` (and changes
    /// nothing) when there is no record for `id`.
    async fn patch(&self, id: TabId, patch: TaskPatch) -> Result<bool, StoreError>;

    /// Remove the record for `id`. Returns whether one existed.
    async fn delete(&self, id: TabId) -> Result<bool, StoreError>;

    /// All records, ordered by tab id.
    async fn list(&self) -> Result<Vec<PendingTask>, StoreError>;
}
