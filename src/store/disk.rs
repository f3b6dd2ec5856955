use super::Storage;
use anyhow::{Context, Result};
use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::debug;

const PARTITION: &str = "local_storage";

/// Storage persisted in a fjall keyspace.
pub struct DiskStorage {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl DiskStorage {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create data directory: {}", path.display()))?;

        let keyspace = Config::new(path.join("store"))
            .open()
            .with_context(|| format!("Failed to open keyspace at {}", path.display()))?;
        let partition = keyspace
            .open_partition(PARTITION, PartitionCreateOptions::default())
            .context("Failed to open storage partition")?;

        debug!(path = %path.display(), "Opened disk storage");
        Ok(Self {
            keyspace,
            partition,
        })
    }
}

impl Storage for DiskStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let Some(value) = self.partition.get(key)? else {
            debug!(key, "Storage MISS");
            return Ok(None);
        };
        debug!(key, "Storage HIT");
        let text = String::from_utf8(value.to_vec())
            .with_context(|| format!("Stored value for {key} is not UTF-8"))?;
        Ok(Some(text))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.partition.insert(key, value)?;
        // Durable before the caller updates its in-memory copy
        self.keyspace.persist(PersistMode::SyncAll)?;
        debug!(key, bytes = value.len(), "Storage SET");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_disk_storage_get_set() {
        let dir = tempdir().unwrap();
        let storage = DiskStorage::open(dir.path()).unwrap();

        // Initially, storage is empty
        assert!(storage.get("history").unwrap().is_none());

        storage.set("history", r#"[{"a":1}]"#).unwrap();
        assert_eq!(
            storage.get("history").unwrap().as_deref(),
            Some(r#"[{"a":1}]"#)
        );

        storage.set("history", "[]").unwrap();
        assert_eq!(storage.get("history").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_disk_storage_survives_reopen() {
        let dir = tempdir().unwrap();
        {
            let storage = DiskStorage::open(dir.path()).unwrap();
            storage.set("history", "[\"€\"]").unwrap();
        }

        let storage = DiskStorage::open(dir.path()).unwrap();
        assert_eq!(storage.get("history").unwrap().as_deref(), Some("[\"€\"]"));
    }

    #[test]
    fn test_disk_storage_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let storage = DiskStorage::open(&nested).unwrap();
        storage.set("k", "v").unwrap();
        assert!(nested.exists());
    }
}
