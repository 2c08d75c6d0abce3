// src/import.rs

use crate::error::{Result, WorklogError};
use crate::models::NewEntry;
use serde_json::Value;
use std::io::Read;

const OPERATOR_KEYS: &[&str] = &["operator", "person", "Persona", "name"];
const MACHINE_KEYS: &[&str] = &["macchina", "machine", "equipment", "Equipment"];
const LINE_KEYS: &[&str] = &["linea", "line", "cantiere", "Cantiere", "site"];
const HOURS_KEYS: &[&str] = &["ore", "hours", "ore lavorate"];
const DATE_KEYS: &[&str] = &["data", "date", "work_date"];
const DESCRIPTION_KEYS: &[&str] = &[
    "descrizione",
    "description",
    "workType",
    "tipo di lavoro",
    "work_type",
    "notes",
];

/// Reads a JSON array of loosely-keyed objects into drafts.
///
/// Non-object items become empty drafts so they are counted and then
/// rejected by validation.
pub fn read_drafts<R: Read>(reader: R) -> Result<Vec<NewEntry>> {
    let value: Value = serde_json::from_reader(reader)?;
    let items = match value {
        Value::Array(items) => items,
        _ => {
            return Err(WorklogError::Validation(
                "import file must contain a JSON array".to_string(),
            ))
        }
    };
    Ok(items.iter().map(draft_from_value).collect())
}

fn first_text(obj: &Value, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find_map(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .unwrap_or_default()
}

fn first_number(obj: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find_map(|v| match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().replace(',', ".").parse().ok(),
            _ => None,
        })
}

fn draft_from_value(obj: &Value) -> NewEntry {
    NewEntry {
        operator: first_text(obj, OPERATOR_KEYS),
        machine: first_text(obj, MACHINE_KEYS),
        line: first_text(obj, LINE_KEYS),
        hours: first_number(obj, HOURS_KEYS),
        date: first_text(obj, DATE_KEYS),
        description: first_text(obj, DESCRIPTION_KEYS),
    }
}
