// src/db/sqlite.rs

use super::EntryStore;
use crate::error::Result;
use crate::models::LogEntry;
use rusqlite::{params, Connection};
use std::collections::HashSet;
use std::path::Path;

/// Ids bound per `DELETE ... IN (...)`; SQLite caps host parameters per statement.
const DELETE_BATCH: usize = 500;

/// Single-table SQLite backing.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        initialize_db(&conn)?;
        Ok(Self { conn })
    }
}

/// Creates the table and indexes if they do not exist.
pub fn initialize_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS entries (
            id          INTEGER PRIMARY KEY,
            operator    TEXT NOT NULL,
            machine     TEXT NOT NULL,
            line        TEXT NOT NULL,
            hours       REAL NOT NULL CHECK (hours > 0),
            work_date   TEXT NOT NULL,
            description TEXT NOT NULL,
            created_at  TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_entries_date ON entries(work_date);
        CREATE INDEX IF NOT EXISTS idx_entries_operator ON entries(operator);",
    )?;
    Ok(())
}

fn insert(conn: &Connection, e: &LogEntry) -> rusqlite::Result<usize> {
    conn.execute(
        "INSERT INTO entries (id, operator, machine, line, hours, work_date, description, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            e.id,
            e.operator,
            e.machine,
            e.line,
            e.hours,
            e.date,
            e.description,
            e.created_at
        ],
    )
}

impl EntryStore for SqliteStore {
    fn load_all(&self) -> Result<Vec<LogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, operator, machine, line, hours, work_date, description, created_at
             FROM entries ORDER BY id",
        )?;
        let entries = stmt
            .query_map([], |row| {
                Ok(LogEntry {
                    id: row.get(0)?,
                    operator: row.get(1)?,
                    machine: row.get(2)?,
                    line: row.get(3)?,
                    hours: row.get(4)?,
                    date: row.get(5)?,
                    description: row.get(6)?,
                    created_at: row.get(7)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    fn replace_all(&mut self, entries: &[LogEntry]) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM entries", [])?;
        for e in entries {
            insert(&tx, e)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        insert(&self.conn, entry)?;
        Ok(())
    }

    fn remove_ids(&mut self, ids: &HashSet<i64>) -> Result<usize> {
        if ids.is_empty() {
            return Ok(0);
        }

        let ids: Vec<i64> = ids.iter().copied().collect();
        let tx = self.conn.transaction()?;
        let mut count = 0;
        for chunk in ids.chunks(DELETE_BATCH) {
            let placeholders = vec!["?"; chunk.len()].join(",");
            let query = format!("DELETE FROM entries WHERE id IN ({})", placeholders);
            count += tx.execute(&query, rusqlite::params_from_iter(chunk))?;
        }
        tx.commit()?;
        Ok(count)
    }

    fn clear(&mut self) -> Result<usize> {
        let count = self.conn.execute("DELETE FROM entries", [])?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::tests::sample;

    #[test]
    fn rows_round_trip_in_id_order() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let mut entries = sample();
        entries.reverse();
        for e in &entries {
            store.append(e).unwrap();
        }
        assert_eq!(store.load_all().unwrap(), sample());
    }

    #[test]
    fn remove_ids_deletes_only_known_rows() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.replace_all(&sample()).unwrap();
        let removed = store.remove_ids(&HashSet::from([1, 3, 77])).unwrap();
        assert_eq!(removed, 2);
        let ids: Vec<i64> = store.load_all().unwrap().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 4]);
    }

    #[test]
    fn remove_ids_handles_more_ids_than_host_parameters() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let template = &sample()[0];
        let entries: Vec<LogEntry> = (1..=40_000)
            .map(|id| LogEntry {
                id,
                ..template.clone()
            })
            .collect();
        store.replace_all(&entries).unwrap();

        let doomed: HashSet<i64> = (1..=39_990).collect();
        assert_eq!(store.remove_ids(&doomed).unwrap(), 39_990);
        let ids: Vec<i64> = store.load_all().unwrap().iter().map(|e| e.id).collect();
        assert_eq!(ids, (39_991..=40_000).collect::<Vec<_>>());
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.append(&sample()[0]).unwrap();
        assert!(store.append(&sample()[0]).is_err());
        assert_eq!(store.load_all().unwrap().len(), 1);
    }

    #[test]
    fn clear_counts_rows() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.replace_all(&sample()).unwrap();
        assert_eq!(store.clear().unwrap(), 4);
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn file_backed_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entries.db");
        {
            let mut store = SqliteStore::open(&path).unwrap();
            store.replace_all(&sample()).unwrap();
        }
        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.load_all().unwrap().len(), 4);
    }
}
