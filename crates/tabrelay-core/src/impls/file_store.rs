//! JsonFileTaskStore - ファイルに永続化する TaskStore
//!
//! The file is a flat JSON key-value document. Pending tasks live under the
//! single well-known key [`PENDING_KEY`] as a `tab id -> task` map; any other
//! keys in the document are preserved untouched. No schema versioning.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::Mutex;

use crate::domain::{PendingTask, StoreError, TabId, TaskPatch};
use crate::ports::TaskStore;

pub const PENDING_KEY: &str = "pendingAiTabs";

type PendingMap = BTreeMap<TabId, PendingTask>;

/// Durable store surviving coordinator restarts.
///
/// Every operation is a read-modify-write of the whole file under one async
/// mutex, so operations on the same key apply in issue order. Writes go to a
/// sibling temp file first and are renamed into place.
pub struct JsonFileTaskStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileTaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn corrupt(&self, source: serde_json::Error) -> StoreError {
        StoreError::Corrupt {
            path: self.path.clone(),
            source,
        }
    }

    async fn load_document(&self) -> Result<Map<String, Value>, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Map::new()),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| self.corrupt(e)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn pending_of(&self, document: &Map<String, Value>) -> Result<PendingMap, StoreError> {
        match document.get(PENDING_KEY) {
            None | Some(Value::Null) => Ok(PendingMap::new()),
            Some(value) => serde_json::from_value(value.clone()).map_err(|e| self.corrupt(e)),
        }
    }

    async fn save(
        &self,
        mut document: Map<String, Value>,
        pending: &PendingMap,
    ) -> Result<(), StoreError> {
        let value = serde_json::to_value(pending).map_err(|e| self.corrupt(e))?;
        document.insert(PENDING_KEY.to_string(), value);
        let bytes = serde_json::to_vec_pretty(&document).map_err(|e| self.corrupt(e))?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        let tmp = tmp_path(&self.path);
        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|e| self.io_error(e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| self.io_error(e))
    }

    async fn read_pending(&self) -> Result<PendingMap, StoreError> {
        let document = self.load_document().await?;
        self.pending_of(&document)
    }

    /// Read-modify-write. `f` returns its result and whether it changed the map.
    async fn mutate<R>(
        &self,
        f: impl FnOnce(&mut PendingMap) -> (R, bool) + Send,
    ) -> Result<R, StoreError> {
        let _guard = self.lock.lock().await;
        let document = self.load_document().await?;
        let mut pending = self.pending_of(&document)?;
        let (result, changed) = f(&mut pending);
        if changed {
            self.save(document, &pending).await?;
        }
        Ok(result)
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

#[async_trait]
impl TaskStore for JsonFileTaskStore {
    async fn put(&self, id: TabId, task: PendingTask) -> Result<(), StoreError> {
        self.mutate(move |pending| {
            pending.insert(id, task);
            ((), true)
        })
        .await
    }

    async fn get(&self, id: TabId) -> Result<Option<PendingTask>, StoreError> {
        let _guard = self.lock.lock().await;
        Ok(self.read_pending().await?.remove(&id))
    }

    async fn patch(&self, id: TabId, patch: TaskPatch) -> Result<bool, StoreError> {
        self.mutate(move |pending| match pending.get_mut(&id) {
            Some(record) => {
                record.apply(&patch);
                (true, true)
            }
            None => (false, false),
        })
        .await
    }

    async fn delete(&self, id: TabId) -> Result<bool, StoreError> {
        self.mutate(move |pending| {
            let removed = pending.remove(&id).is_some();
            (removed, removed)
        })
        .await
    }

    async fn list(&self) -> Result<Vec<PendingTask>, StoreError> {
        let _guard = self.lock.lock().await;
        Ok(self.read_pending().await?.into_values().collect())
    }
}
