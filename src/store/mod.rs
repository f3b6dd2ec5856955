//! Durable key/value storage backing the conversion history.

pub mod disk;
pub mod memory;

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

pub use disk::DiskStorage;
pub use memory::MemoryStorage;

/// A string key/value store. Reads and writes are synchronous; a `set`
/// that returns `Ok` is visible to every later `get`.
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Opens disk storage under `data_path`. Without a data directory the
/// history lives in memory for this process only; a directory that cannot
/// be opened is an error.
pub fn open_storage(data_path: Option<&Path>) -> Result<Arc<dyn Storage>> {
    let Some(path) = data_path else {
        warn!("No data directory available, history will not be persisted");
        return Ok(Arc::new(MemoryStorage::new()));
    };

    let storage = DiskStorage::open(path)
        .with_context(|| format!("Failed to open history storage at {}", path.display()))?;
    Ok(Arc::new(storage))
}
