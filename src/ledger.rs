// src/ledger.rs

use crate::dates;
use crate::db::EntryStore;
use crate::error::{Result, WorklogError};
use crate::filter;
use crate::models::{FilterSpec, LogEntry, NewEntry};
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

/// The entry register. Every mutation holds the lock across its read and its
/// write, so writers inside one process are serialized.
pub struct Ledger {
    store: Mutex<Box<dyn EntryStore>>,
}

/// Outcome of a bulk import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: usize,
    pub total: usize,
}

impl Ledger {
    pub fn new(store: Box<dyn EntryStore>) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Box<dyn EntryStore>> {
        self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Validates and appends a new entry.
    pub fn record(&self, draft: NewEntry) -> Result<LogEntry> {
        let mut store = self.lock();
        let existing = store.load_all()?;
        let entry = build_entry(draft, next_id(&existing)?, now())?;
        store.append(&entry)?;
        tracing::info!(id = entry.id, operator = %entry.operator, "entry recorded");
        Ok(entry)
    }

    #[cfg(test)]
    pub fn all(&self) -> Result<Vec<LogEntry>> {
        self.lock().load_all()
    }

    /// Matching entries in store order.
    pub fn search(&self, spec: &FilterSpec) -> Result<Vec<LogEntry>> {
        let entries = self.lock().load_all()?;
        Ok(filter::apply(&entries, spec))
    }

    /// Removes every entry matching `spec`. Zero matches means no write.
    pub fn delete_filtered(&self, spec: &FilterSpec) -> Result<usize> {
        let mut store = self.lock();
        let entries = store.load_all()?;
        let ids = filter::matching_ids(&entries, spec);
        if ids.is_empty() {
            tracing::debug!(?spec, "delete by filter matched nothing");
            return Ok(0);
        }
        let deleted = store.remove_ids(&ids)?;
        tracing::info!(deleted, "entries deleted by filter");
        Ok(deleted)
    }

    pub fn delete_all(&self) -> Result<usize> {
        let deleted = self.lock().clear()?;
        tracing::info!(deleted, "all entries deleted");
        Ok(deleted)
    }

    pub fn delete_by_id(&self, id: i64) -> Result<()> {
        let removed = self.lock().remove_ids(&HashSet::from([id]))?;
        if removed == 0 {
            return Err(WorklogError::NotFound(id));
        }
        tracing::info!(id, "entry deleted");
        Ok(())
    }

    /// Appends every valid draft in one write; invalid drafts are skipped.
    pub fn import(&self, drafts: Vec<NewEntry>) -> Result<ImportReport> {
        let total = drafts.len();
        let mut store = self.lock();
        let mut entries = store.load_all()?;
        let before = entries.len();

        for (row, draft) in drafts.into_iter().enumerate() {
            match build_entry(draft, next_id(&entries)?, now()) {
                Ok(entry) => entries.push(entry),
                Err(e) => tracing::warn!(row, error = %e, "skipping import row"),
            }
        }

        let imported = entries.len() - before;
        if imported > 0 {
            store.replace_all(&entries)?;
        }
        Ok(ImportReport { imported, total })
    }
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Epoch milliseconds, bumped past the largest id in use.
fn next_id(existing: &[LogEntry]) -> Result<i64> {
    let stamp = chrono::Utc::now().timestamp_millis();
    match existing.iter().map(|e| e.id).max() {
        Some(max) if max >= stamp => max.checked_add(1).ok_or_else(|| {
            WorklogError::Validation(format!("no entry id left after {}", max))
        }),
        _ => Ok(stamp),
    }
}

fn required(value: String, name: &str) -> Result<String> {
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(WorklogError::Validation(format!("{} is required", name)));
    }
    Ok(value)
}

/// Trims, checks and normalizes a draft into a storable entry.
pub fn build_entry(draft: NewEntry, id: i64, created_at: String) -> Result<LogEntry> {
    let operator = required(draft.operator, "operator")?;
    let machine = required(draft.machine, "macchina")?;
    let line = required(draft.line, "linea")?;
    let description = required(draft.description, "descrizione")?;

    let hours = match draft.hours {
        Some(h) if h.is_finite() && h > 0.0 => h,
        _ => {
            return Err(WorklogError::Validation(
                "ore must be a positive number".to_string(),
            ))
        }
    };

    let date = dates::to_canonical(Some(draft.date.trim()))
        .ok_or_else(|| WorklogError::Validation("data is required".to_string()))?;
    if !dates::is_canonical(&date) {
        return Err(WorklogError::Validation(format!(
            "Invalid date '{}'. Use DD/MM/YYYY or YYYY-MM-DD.",
            date
        )));
    }

    Ok(LogEntry {
        id,
        operator,
        machine,
        line,
        hours,
        date,
        description,
        created_at,
    })
}
