// src/models.rs

use serde::{Deserialize, Deserializer, Serialize};

/// One recorded unit of work. Immutable once stored; only deletable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: i64,
    pub operator: String,
    #[serde(rename = "macchina")]
    pub machine: String,
    #[serde(rename = "linea")]
    pub line: String,
    #[serde(rename = "ore")]
    pub hours: f64,
    /// Canonical `DD/MM/YYYY` text, kept verbatim through storage.
    #[serde(rename = "data")]
    pub date: String,
    #[serde(rename = "descrizione")]
    pub description: String,
    #[serde(rename = "createdAt")]
    pub created_at: String, // RFC3339
}

/// Payload of a create request, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewEntry {
    #[serde(default)]
    pub operator: String,
    #[serde(default, rename = "macchina")]
    pub machine: String,
    #[serde(default, rename = "linea")]
    pub line: String,
    #[serde(default, rename = "ore")]
    pub hours: Option<f64>,
    #[serde(default, rename = "data")]
    pub date: String,
    #[serde(default, rename = "descrizione")]
    pub description: String,
}

/// Ephemeral multi-field query. `None` means no constraint on that dimension.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    #[serde(
        default,
        rename = "macchina",
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub machine: Option<String>,
    #[serde(
        default,
        rename = "linea",
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub line: Option<String>,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub operator: Option<String>,
    #[serde(
        default,
        rename = "descrContains",
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub description_contains: Option<String>,
    #[serde(
        default,
        rename = "dataFrom",
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_from: Option<String>,
    #[serde(
        default,
        rename = "dataTo",
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_to: Option<String>,
}

impl FilterSpec {
    pub fn is_empty(&self) -> bool {
        self.machine.is_none()
            && self.line.is_none()
            && self.operator.is_none()
            && self.description_contains.is_none()
            && self.date_from.is_none()
            && self.date_to.is_none()
    }
}

// The panel sends "" for cleared inputs.
fn blank_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}
