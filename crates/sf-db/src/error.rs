//! Error types for sf-db

use thiserror::Error;

/// Warehouse-reported errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Warehouse connection failed: {0}")]
    ConnectionError(String),

    /// Statement execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Table not found (D003)
    #[error("[D003] Table or view not found: {0}")]
    TableNotFound(String),

    /// Object already exists (D004)
    #[error("[D004] Object already exists: {0}")]
    AlreadyExists(String),

    /// Key or NOT NULL constraint rejected a row (D005)
    #[error("[D005] Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Bulk ingest failed (D006)
    #[error("[D006] Bulk load failed: {0}")]
    LoadFailure(String),

    /// Mutex poisoned (D007)
    #[error("[D007] Warehouse mutex poisoned: {0}")]
    MutexPoisoned(String),

    /// Internal error (D008)
    #[error("[D008] Internal warehouse error: {0}")]
    Internal(String),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl DbError {
    /// Classify a raw engine message.
    ///
    /// duckdb::Error carries no structured variants, so the message prefix is
    /// the only thing to go on. Patterns stay narrow so function and type
    /// errors remain `ExecutionError`.
    pub fn classify(msg: String) -> Self {
        if msg.contains("Constraint Error") {
            DbError::ConstraintViolation(msg)
        } else if msg.contains("Catalog Error") && msg.contains("already exists") {
            DbError::AlreadyExists(msg)
        } else if msg.contains("Table with name")
            || msg.contains("Table or view with name")
            || (msg.contains("Catalog Error") && msg.contains("Table") && msg.contains("not found"))
        {
            DbError::TableNotFound(msg)
        } else if msg.contains("IO Error")
            || msg.contains("No files found")
            || msg.contains("Conversion Error")
            || msg.contains("Malformed JSON")
        {
            DbError::LoadFailure(msg)
        } else {
            DbError::ExecutionError(msg)
        }
    }
}

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        DbError::classify(err.to_string())
    }
}
