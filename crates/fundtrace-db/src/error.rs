//! Sink error types.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid row in {table}: {reason}")]
    InvalidRow { table: &'static str, reason: String },

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Unknown output format: {0}")]
    UnknownFormat(String),
}

impl DbError {
    pub fn invalid_row(table: &'static str, reason: impl Into<String>) -> Self {
        DbError::InvalidRow { table, reason: reason.into() }
    }
}
