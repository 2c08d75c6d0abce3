// src/roster.rs

use crate::error::Result;
use std::io::Read;
use std::path::Path;

const HEADER_NAMES: [&str; 5] = ["persona", "person", "name", "operatore", "operator"];

/// Operator names from the first column of a CSV roster file.
///
/// A missing file is an empty roster.
pub fn load_roster(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let file = std::fs::File::open(path)?;
    read_roster(file)
}

/// Blank cells are skipped, a header in the first row is dropped, and
/// duplicates keep their first position.
pub fn read_roster<R: Read>(reader: R) -> Result<Vec<String>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut names: Vec<String> = Vec::new();
    for (row, record) in csv_reader.records().enumerate() {
        let record = record?;
        let value = record.get(0).unwrap_or("").trim();
        if value.is_empty() {
            continue;
        }
        if row == 0 && HEADER_NAMES.contains(&value.to_lowercase().as_str()) {
            continue;
        }
        if !names.iter().any(|n| n == value) {
            names.push(value.to_string());
        }
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_blanks_and_duplicates_are_dropped() {
        let data = "Operatore,reparto\nMario,A\n,\nLuca,B\nMario,C\n  Anna  \n";
        let names = read_roster(data.as_bytes()).unwrap();
        assert_eq!(names, vec!["Mario", "Luca", "Anna"]);
    }

    #[test]
    fn first_row_is_kept_when_not_a_header() {
        let names = read_roster("Mario\nLuca\n".as_bytes()).unwrap();
        assert_eq!(names, vec!["Mario", "Luca"]);
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_roster(&dir.path().join("operators.csv")).unwrap().is_empty());
    }
}
