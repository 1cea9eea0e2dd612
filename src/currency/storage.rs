//! Key/value persistence behind the rate service. The production store is a
//! small redb database under the user's data directory; tests use the
//! in-memory variant. Values are JSON documents.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use directories::ProjectDirs;
use redb::{Database, ReadableTable, TableDefinition};
use serde_json::Value;

use crate::shared::error::{AppError, AppResult};

const KV_TABLE: TableDefinition<&str, &str> = TableDefinition::new("omniconvert_kv");

/// The external persistent store contract: small JSON values by string key.
/// Read errors surface so the caller can decide (the rate service treats
/// them as cache misses); write errors are for the caller to log and drop.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn get(&self, key: &str) -> AppResult<Option<Value>>;
    async fn set(&self, key: &str, value: Value) -> AppResult<()>;
    async fn remove(&self, key: &str) -> AppResult<()>;
}

/// redb-backed store.
pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    /// Open (or create) the store at the default per-user data path.
    pub fn open_default() -> AppResult<Self> {
        Self::open(Self::default_path()?)
    }

    pub fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::Storage(format!("Failed to create data dir: {}", e)))?;
        }
        let db = Database::create(path.as_ref())
            .map_err(|e| AppError::Storage(e.to_string()))?;
        Ok(Self { db })
    }

    fn default_path() -> AppResult<PathBuf> {
        let dirs = ProjectDirs::from("com", "omniconvert", "omniconvert")
            .ok_or_else(|| AppError::Storage("Unable to determine data directory".to_string()))?;
        Ok(dirs.data_dir().join("cache.redb"))
    }

    fn read(&self, key: &str) -> AppResult<Option<Value>> {
        let txn = self
            .db
            .begin_read()
            .map_err(|e| AppError::Storage(e.to_string()))?;
        let table = match txn.open_table(KV_TABLE) {
            Ok(table) => table,
            // Table does not exist until the first write.
            Err(_) => return Ok(None),
        };
        let raw = table
            .get(key)
            .map_err(|e| AppError::Storage(e.to_string()))?;
        match raw {
            Some(entry) => {
                let value: Value = serde_json::from_str(entry.value())
                    .map_err(|e| AppError::Storage(format!("Corrupt value for {}: {}", key, e)))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn write(&self, key: &str, value: Option<&Value>) -> AppResult<()> {
        let txn = self
            .db
            .begin_write()
            .map_err(|e| AppError::Storage(e.to_string()))?;
        {
            let mut table = txn
                .open_table(KV_TABLE)
                .map_err(|e| AppError::Storage(e.to_string()))?;
            match value {
                Some(value) => {
                    let serialized =
                        serde_json::to_string(value).map_err(|e| AppError::Storage(e.to_string()))?;
                    table
                        .insert(key, serialized.as_str())
                        .map_err(|e| AppError::Storage(e.to_string()))?;
                }
                None => {
                    table
                        .remove(key)
                        .map_err(|e| AppError::Storage(e.to_string()))?;
                }
            }
        }
        txn.commit().map_err(|e| AppError::Storage(e.to_string()))
    }
}

#[async_trait]
impl Storage for RedbStore {
    async fn get(&self, key: &str) -> AppResult<Option<Value>> {
        self.read(key)
    }

    async fn set(&self, key: &str, value: Value) -> AppResult<()> {
        self.write(key, Some(&value))
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        self.write(key, None)
    }
}

/// In-memory store for tests and ephemeral hosts.
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStore {
    async fn get(&self, key: &str) -> AppResult<Option<Value>> {
        let values = self
            .values
            .lock()
            .map_err(|_| AppError::Storage("store poisoned".to_string()))?;
        Ok(values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> AppResult<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| AppError::Storage("store poisoned".to_string()))?;
        values.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| AppError::Storage("store poisoned".to_string()))?;
        values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn memory_store_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("missing").await.unwrap(), None);
        store.set("k", json!({"a": 1})).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(json!({"a": 1})));
        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn redb_store_round_trip() {
        let dir = std::env::temp_dir().join(format!("omniconvert-test-{}", std::process::id()));
        let store = RedbStore::open(dir.join("kv.redb")).unwrap();
        store.set("lastUserActivity", json!(42)).await.unwrap();
        assert_eq!(store.get("lastUserActivity").await.unwrap(), Some(json!(42)));
        store.remove("lastUserActivity").await.unwrap();
        assert_eq!(store.get("lastUserActivity").await.unwrap(), None);
        let _ = std::fs::remove_dir_all(dir);
    }
}
