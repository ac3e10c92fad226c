//! Persistent key-value storage for Witness.
//!
//! This module provides the trait-based abstraction both repositories
//! persist through: an async get/set/clear contract over string keys and
//! string values. Each call is atomic for its single key; multi-key
//! sequences are not transactional, and callers must not assume otherwise.

use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::{WitnessError, WitnessResult};

/// Trait for persistent key-value store implementations.
///
/// All operations are asynchronous and may fail with a storage I/O error.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, or `None` if the key is absent
    fn get(&self, key: &str) -> impl Future<Output = WitnessResult<Option<String>>> + Send;

    /// Write `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> impl Future<Output = WitnessResult<()>> + Send;

    /// Remove every key from the store
    fn clear(&self) -> impl Future<Output = WitnessResult<()>> + Send;
}

/// A store that keeps one JSON file per key under a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at the given directory
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> WitnessResult<Option<String>> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(WitnessError::storage(format!(
                "failed to read key '{}': {}",
                key, err
            ))),
        }
    }

    async fn set(&self, key: &str, value: &str) -> WitnessResult<()> {
        tokio::fs::create_dir_all(&self.root).await.map_err(|err| {
            WitnessError::storage(format!("failed to create data directory: {}", err))
        })?;

        // Write-then-rename keeps the single-key write atomic
        let path = self.path_for(key);
        let tmp = self.root.join(format!("{}.json.tmp", key));
        tokio::fs::write(&tmp, value)
            .await
            .map_err(|err| WitnessError::storage(format!("failed to write key '{}': {}", key, err)))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|err| WitnessError::storage(format!("failed to write key '{}': {}", key, err)))?;

        Ok(())
    }

    async fn clear(&self) -> WitnessResult<()> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(err) => {
                return Err(WitnessError::storage(format!(
                    "failed to clear store: {}",
                    err
                )))
            }
        };

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|err| WitnessError::storage(format!("failed to clear store: {}", err)))?
        {
            if entry.path().extension().and_then(|e| e.to_str()) == Some("json") {
                tokio::fs::remove_file(entry.path()).await.map_err(|err| {
                    WitnessError::storage(format!("failed to clear store: {}", err))
                })?;
            }
        }

        Ok(())
    }
}

/// An in-memory store, used by tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    map: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored
    pub fn len(&self) -> usize {
        self.map.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> WitnessResult<Option<String>> {
        Ok(self.map.read().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> WitnessResult<()> {
        self.map
            .write()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn clear(&self) -> WitnessResult<()> {
        self.map.write().unwrap().clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("recordings").await.unwrap(), None);

        store.set("recordings", "[]").await.unwrap();
        assert_eq!(
            store.get("recordings").await.unwrap(),
            Some("[]".to_string())
        );

        store.set("recordings", "[1]").await.unwrap();
        assert_eq!(
            store.get("recordings").await.unwrap(),
            Some("[1]".to_string())
        );
    }

    #[tokio::test]
    async fn test_memory_store_clear() {
        let store = MemoryStore::new();
        store.set("recordings", "[]").await.unwrap();
        store.set("incidents", "[]").await.unwrap();
        assert_eq!(store.len(), 2);

        store.clear().await.unwrap();
        assert!(store.is_empty());
        assert_eq!(store.get("incidents").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        assert_eq!(store.get("recordings").await.unwrap(), None);

        store.set("recordings", r#"[{"id":"a"}]"#).await.unwrap();
        assert_eq!(
            store.get("recordings").await.unwrap(),
            Some(r#"[{"id":"a"}]"#.to_string())
        );

        // Value lands in a <key>.json file under the root
        assert!(dir.path().join("recordings.json").exists());
    }

    #[tokio::test]
    async fn test_file_store_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.set("incidents", "old").await.unwrap();
        store.set("incidents", "new").await.unwrap();
        assert_eq!(store.get("incidents").await.unwrap(), Some("new".to_string()));
    }

    #[tokio::test]
    async fn test_file_store_clear_removes_json_only() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.set("recordings", "[]").await.unwrap();
        std::fs::write(dir.path().join("audio.m4a"), b"bytes").unwrap();

        store.clear().await.unwrap();
        assert_eq!(store.get("recordings").await.unwrap(), None);
        assert!(dir.path().join("audio.m4a").exists());
    }

    #[tokio::test]
    async fn test_file_store_clear_missing_root_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("never-created"));
        store.clear().await.unwrap();
    }
}
