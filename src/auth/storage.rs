// Allow dead code: the in-memory provider is the substitution seam for tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};

/// Durable key-value storage scoped to this client installation.
///
/// The session store treats this as an injected capability: production runs
/// against the filesystem, tests substitute `MemoryStorage`. Writes are not
/// atomic across keys; readers must treat a partially-present pair of keys
/// as absent.
pub trait StorageProvider: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Storage backed by one file per key under the application data directory.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl StorageProvider for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read storage key: {}", key))?;
        Ok(Some(contents))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create storage directory: {}", self.dir.display()))?;
        std::fs::write(self.key_path(key), value)
            .with_context(|| format!("Failed to write storage key: {}", key))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.key_path(key);
        if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove storage key: {}", key))?;
        }
        Ok(())
    }
}

/// In-memory storage for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| anyhow::anyhow!("Storage mutex poisoned"))
    }
}

impl StorageProvider for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    static DIR_COUNTER: AtomicU32 = AtomicU32::new(0);

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!(
            "nokori-storage-test-{}-{}",
            std::process::id(),
            DIR_COUNTER.fetch_add(1, Ordering::SeqCst)
        ))
    }

    #[test]
    fn test_file_storage_round_trip() {
        let dir = temp_dir();
        let storage = FileStorage::new(dir.clone());

        assert!(storage.get("token").unwrap().is_none());

        storage.set("token", "tok1").unwrap();
        assert_eq!(storage.get("token").unwrap().as_deref(), Some("tok1"));

        storage.set("token", "tok2").unwrap();
        assert_eq!(storage.get("token").unwrap().as_deref(), Some("tok2"));

        storage.remove("token").unwrap();
        assert!(storage.get("token").unwrap().is_none());

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_file_storage_remove_missing_key_is_ok() {
        let dir = temp_dir();
        let storage = FileStorage::new(dir.clone());
        storage.remove("never-written").unwrap();
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_memory_storage_round_trip() {
        let storage = MemoryStorage::new();
        assert!(storage.get("user").unwrap().is_none());
        storage.set("user", "{}").unwrap();
        assert_eq!(storage.get("user").unwrap().as_deref(), Some("{}"));
        storage.remove("user").unwrap();
        assert!(storage.get("user").unwrap().is_none());
    }
}
