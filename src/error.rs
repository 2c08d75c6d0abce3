// src/error.rs

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorklogError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database Error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("JSON Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("XLSX Error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Configuration Error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Entry ID {0} not found")]
    NotFound(i64),

    #[error("Unauthorized")]
    Auth,
}

impl WorklogError {
    /// Storage failures are everything the caller cannot fix by changing the request.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            WorklogError::Io(_)
                | WorklogError::Sql(_)
                | WorklogError::Json(_)
                | WorklogError::Csv(_)
                | WorklogError::Xlsx(_)
                | WorklogError::Config(_)
                | WorklogError::HomeDirNotFound
        )
    }
}

pub type Result<T> = std::result::Result<T, WorklogError>;
