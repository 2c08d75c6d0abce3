// src/db/mod.rs

mod json_file;
#[cfg(test)]
mod memory;
mod sqlite;

pub use json_file::JsonFileStore;
#[cfg(test)]
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::{Result, WorklogError};
use crate::models::LogEntry;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Which backing the entry collection lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Json,
    Sqlite,
}

/// Persistence for the ordered entry collection.
///
/// Only the first three methods are required; bulk removal falls back to
/// read-all then write-all.
pub trait EntryStore: Send {
    /// Every entry, in insertion order.
    fn load_all(&self) -> Result<Vec<LogEntry>>;

    fn replace_all(&mut self, entries: &[LogEntry]) -> Result<()>;

    fn append(&mut self, entry: &LogEntry) -> Result<()>;

    /// Removes entries whose id is in `ids`; unknown ids are skipped.
    /// Does not write when nothing matches.
    fn remove_ids(&mut self, ids: &HashSet<i64>) -> Result<usize> {
        if ids.is_empty() {
            return Ok(0);
        }
        let mut entries = self.load_all()?;
        let before = entries.len();
        entries.retain(|e| !ids.contains(&e.id));
        let removed = before - entries.len();
        if removed > 0 {
            self.replace_all(&entries)?;
        }
        Ok(removed)
    }

    /// Empties the store, returning how many entries existed.
    fn clear(&mut self) -> Result<usize> {
        let count = self.load_all()?.len();
        self.replace_all(&[])?;
        Ok(count)
    }
}

/// Standard data file location (~/.config/worklog/entries.json or entries.db).
pub fn get_default_path(kind: StoreKind) -> Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or(WorklogError::HomeDirNotFound)?;
    let file = match kind {
        StoreKind::Json => "entries.json",
        StoreKind::Sqlite => "entries.db",
    };
    Ok(home_dir.join(".config/worklog").join(file))
}

/// Opens the configured backing, creating its parent directory if needed.
pub fn open_store(kind: StoreKind, path: &Path) -> Result<Box<dyn EntryStore>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    tracing::debug!(?kind, path = %path.display(), "opening entry store");
    let store: Box<dyn EntryStore> = match kind {
        StoreKind::Json => Box::new(JsonFileStore::new(path)),
        StoreKind::Sqlite => Box::new(SqliteStore::open(path)?),
    };
    Ok(store)
}
