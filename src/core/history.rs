//! Conversion history, newest first, mirrored into durable storage.

use crate::core::catalog::CurrencyInfo;
use crate::core::error::{Error, Result};
use crate::store::Storage;
use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Storage key holding the JSON array of entries.
pub const HISTORY_KEY: &str = "history";

/// Display format of `HistoryEntry::date`, e.g. `3/14/2025, 9:26:53 AM`.
const DATE_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// One completed conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Converted amount with exactly two fractional digits.
    pub result: String,
    pub flag: String,
    pub symbol: String,
    pub code: String,
    pub country_name: String,
    pub date: String,
}

impl HistoryEntry {
    pub fn new<Tz>(result: String, currency: &CurrencyInfo, at: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        Self {
            result,
            flag: currency.flag.clone(),
            symbol: currency.symbol.clone(),
            code: currency.code.clone(),
            country_name: currency.name.clone(),
            date: at.format(DATE_FORMAT).to_string(),
        }
    }
}

pub type HistoryLog = Vec<HistoryEntry>;

/// Owns the history log. `append` and `remove_at` are the only mutations;
/// each one writes the full log to storage before updating memory.
pub struct HistoryStore {
    storage: Arc<dyn Storage>,
    entries: HistoryLog,
}

impl HistoryStore {
    /// Reads the persisted log. Missing or unreadable data yields an empty log.
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let entries = match read_log(&*storage) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "Discarding unreadable conversion history");
                HistoryLog::new()
            }
        };
        debug!(count = entries.len(), "Loaded conversion history");
        Self { storage, entries }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts `entry` at the head of the log.
    pub fn append(&mut self, entry: HistoryEntry) -> Result<&[HistoryEntry]> {
        let mut updated = Vec::with_capacity(self.entries.len() + 1);
        updated.push(entry);
        updated.extend(self.entries.iter().cloned());

        self.commit(updated)?;
        info!(count = self.entries.len(), "Appended history entry");
        Ok(&self.entries)
    }

    /// Removes the entry at `index`. An out-of-range index leaves the log
    /// and storage untouched.
    pub fn remove_at(&mut self, index: usize) -> Result<&[HistoryEntry]> {
        if index >= self.entries.len() {
            debug!(
                index,
                len = self.entries.len(),
                "Ignoring removal of missing history entry"
            );
            return Ok(&self.entries);
        }

        let updated = self
            .entries
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, entry)| entry.clone())
            .collect();

        self.commit(updated)?;
        info!(index, count = self.entries.len(), "Removed history entry");
        Ok(&self.entries)
    }

    fn commit(&mut self, updated: HistoryLog) -> Result<()> {
        let json = serde_json::to_string(&updated)
            .map_err(|e| Error::Storage(anyhow::anyhow!("Failed to serialize history: {e}")))?;
        self.storage.set(HISTORY_KEY, &json)?;
        self.entries = updated;
        Ok(())
    }
}

fn read_log(storage: &dyn Storage) -> Result<HistoryLog> {
    let Some(raw) = storage.get(HISTORY_KEY)? else {
        return Ok(HistoryLog::new());
    };
    serde_json::from_str(&raw).map_err(|e| Error::StorageCorrupt(e.to_string()))
}
