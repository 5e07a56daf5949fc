//! Unified application error type.
//! All modules (db, core, cli, export) return AppError to keep the error
//! handling consistent and easy to manage.

use rusqlite::ErrorCode;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Store
    // ---------------------------
    #[error("Database error: {0}")]
    Db(rusqlite::Error),

    #[error("Record store unavailable (retry later): {0}")]
    StoreUnavailable(String),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Invalid input
    // ---------------------------
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid field '{0}': expected 'start' or 'end'")]
    InvalidField(String),

    #[error("Missing value for field '{0}'")]
    EmptyValue(String),

    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid period: {0}")]
    InvalidRange(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // ---------------------------
    // Lookup
    // ---------------------------
    // Absent and not-owned records share this variant.
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("No owner id: pass --owner or set owner_id in the configuration")]
    MissingOwner,

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AppError {
    /// True for failures the caller may retry as-is.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::StoreUnavailable(_))
    }

    /// True for the invalid-input family (rejected before reaching storage).
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            AppError::InvalidTimestamp(_)
                | AppError::InvalidField(_)
                | AppError::EmptyValue(_)
                | AppError::InvalidDate(_)
                | AppError::InvalidRange(_)
                | AppError::InvalidInput(_)
        )
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        match e.sqlite_error_code() {
            Some(ErrorCode::DatabaseBusy)
            | Some(ErrorCode::DatabaseLocked)
            | Some(ErrorCode::CannotOpen) => AppError::StoreUnavailable(e.to_string()),
            _ => AppError::Db(e),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Serialization(e.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_database_is_retryable() {
        let e = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
            Some("database is locked".into()),
        );
        let app: AppError = e.into();
        assert!(app.is_retryable());
        assert!(!app.is_invalid_input());
    }

    #[test]
    fn other_sqlite_errors_are_not_retryable() {
        let app: AppError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(app, AppError::Db(_)));
        assert!(!app.is_retryable());
    }

    #[test]
    fn invalid_field_is_invalid_input() {
        assert!(AppError::InvalidField("lunch".into()).is_invalid_input());
        assert!(!AppError::NotFound("r1".into()).is_invalid_input());
    }
}
