//! InMemoryTaskStore - プロセス内の TaskStore（テスト・デモ用）

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{PendingTask, StoreError, TabId, TaskPatch};
use crate::ports::TaskStore;

/// Map behind a single async mutex: every operation is applied atomically
/// and in the order callers acquire the lock.
#[derive(Default)]
pub struct InMemoryTaskStore {
    records: Mutex<BTreeMap<TabId, PendingTask>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn put(&self, id: TabId, task: PendingTask) -> Result<(), StoreError> {
        self.records.lock().await.insert(id, task);
        Ok(())
    }

    async fn get(&self, id: TabId) -> Result<Option<PendingTask>, StoreError> {
        Ok(self.records.lock().await.get(&id).cloned())
    }

    async fn patch(&self, id: TabId, patch: TaskPatch) -> Result<bool, StoreError> {
        let mut records = self.records.lock().await;
        let Some(record) = records.get_mut(&id) else {
            return Ok(false);
        };
        record.apply(&patch);
        Ok(true)
    }

    async fn delete(&self, id: TabId) -> Result<bool, StoreError> {
        Ok(self.records.lock().await.remove(&id).is_some())
    }

    async fn list(&self) -> Result<Vec<PendingTask>, StoreError> {
        Ok(self.records.lock().await.values().cloned().collect())
    }
}
