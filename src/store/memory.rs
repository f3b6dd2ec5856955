use super::Storage;
use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

/// In-memory storage backed by a `HashMap`.
#[derive(Default)]
pub struct MemoryStorage {
    inner: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a storage pre-filled with `key = value`.
    pub fn with_value(key: &str, value: &str) -> Self {
        let storage = Self::new();
        if let Ok(mut map) = storage.inner.write() {
            map.insert(key.to_string(), value.to_string());
        }
        storage
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let map = self
            .inner
            .read()
            .map_err(|_| anyhow!("Memory storage lock poisoned"))?;
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| anyhow!("Memory storage lock poisoned"))?;
        debug!(key, bytes = value.len(), "Storage SET");
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_get_set() {
        let storage = MemoryStorage::new();

        // Initially, storage is empty
        assert!(storage.get("history").unwrap().is_none());

        storage.set("history", "[]").unwrap();
        assert_eq!(storage.get("history").unwrap().as_deref(), Some("[]"));

        // Overwrite replaces the whole value
        storage.set("history", "[1,2]").unwrap();
        assert_eq!(storage.get("history").unwrap().as_deref(), Some("[1,2]"));

        assert!(storage.get("other").unwrap().is_none());
    }

    #[test]
    fn test_memory_storage_with_value() {
        let storage = MemoryStorage::with_value("history", "not json");
        assert_eq!(storage.get("history").unwrap().as_deref(), Some("not json"));
    }
}
