// src/db/json_file.rs

use super::EntryStore;
use crate::error::Result;
use crate::models::LogEntry;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

/// The whole collection as one pretty-printed JSON array, rewritten on every mutation.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Writes to a sibling temp file, then renames it over the target.
    fn write_atomically(&self, entries: &[LogEntry]) -> Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, entries)?;
        tmp.write_all(b"\n")?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl EntryStore for JsonFileStore {
    fn load_all(&self) -> Result<Vec<LogEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let file = std::fs::File::open(&self.path)?;
        let entries = serde_json::from_reader(BufReader::new(file))?;
        Ok(entries)
    }

    fn replace_all(&mut self, entries: &[LogEntry]) -> Result<()> {
        self.write_atomically(entries)
    }

    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let mut entries = self.load_all()?;
        entries.push(entry.clone());
        self.write_atomically(&entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::tests::sample;
    use std::collections::HashSet;

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("entries.json"));
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn entries_survive_reopen_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entries.json");
        let mut store = JsonFileStore::new(&path);
        for e in sample() {
            store.append(&e).unwrap();
        }

        let reopened = JsonFileStore::new(&path);
        let loaded = reopened.load_all().unwrap();
        assert_eq!(loaded, sample());
        assert_eq!(loaded[3].date, "31/12/2023");
    }

    #[test]
    fn file_uses_panel_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entries.json");
        let mut store = JsonFileStore::new(&path);
        store.replace_all(&sample()[..1]).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"macchina\": \"M1\""));
        assert!(raw.contains("\"data\": \"01/01/2024\""));
    }

    #[test]
    fn zero_match_removal_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entries.json");
        let mut store = JsonFileStore::new(&path);
        store.replace_all(&sample()).unwrap();
        let before = std::fs::read(&path).unwrap();

        assert_eq!(store.remove_ids(&HashSet::from([404])).unwrap(), 0);
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entries.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(JsonFileStore::new(&path).load_all().is_err());
    }

    #[test]
    fn failed_persist_is_an_error_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entries.json");
        // A directory in the way makes the final rename fail.
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), "x").unwrap();

        let mut store = JsonFileStore::new(&path);
        let err = store.replace_all(&sample()).unwrap_err();
        assert!(err.is_storage(), "{err}");

        assert_eq!(std::fs::read_to_string(path.join("keep")).unwrap(), "x");
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("entries.json")]);
    }
}
