// src/db/memory.rs

use super::EntryStore;
use crate::error::{Result, WorklogError};
use crate::models::LogEntry;
use std::io;

/// Vec-backed store for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Vec<LogEntry>,
    writes: usize,
    read_only: bool,
}

impl MemoryStore {
    pub fn with_entries(entries: Vec<LogEntry>) -> Self {
        Self {
            entries,
            ..Self::default()
        }
    }

    /// A store whose every write fails, as a full disk would.
    pub fn failing_writes(entries: Vec<LogEntry>) -> Self {
        Self {
            read_only: true,
            ..Self::with_entries(entries)
        }
    }

    /// Number of mutations applied so far.
    pub fn writes(&self) -> usize {
        self.writes
    }

    fn check_writable(&self) -> Result<()> {
        if self.read_only {
            return Err(WorklogError::Io(io::Error::new(
                io::ErrorKind::Other,
                "no space left on device",
            )));
        }
        Ok(())
    }
}

impl EntryStore for MemoryStore {
    fn load_all(&self) -> Result<Vec<LogEntry>> {
        Ok(self.entries.clone())
    }

    fn replace_all(&mut self, entries: &[LogEntry]) -> Result<()> {
        self.check_writable()?;
        self.entries = entries.to_vec();
        self.writes += 1;
        Ok(())
    }

    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        self.check_writable()?;
        self.entries.push(entry.clone());
        self.writes += 1;
        Ok(())
    }
}
