//! Error types for sf-pipeline

use sf_db::DbError;
use sf_schema::SchemaError;
use thiserror::Error;

/// Pipeline phase errors
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Drop or create rejected (P001)
    #[error("[P001] Schema phase failed on {table}: {source}")]
    Schema {
        table: String,
        #[source]
        source: DbError,
    },

    /// Bulk load rejected (P002)
    #[error("[P002] Load into {table} failed: {source}")]
    Load {
        table: String,
        #[source]
        source: DbError,
    },

    /// Format descriptor unreadable or invalid (P003)
    #[error("[P003] Invalid format descriptor '{uri}': {message}")]
    Descriptor { uri: String, message: String },

    /// Typed statement failed catalog validation (P004)
    #[error("[P004] Invalid statement: {0}")]
    Statement(#[from] SchemaError),

    /// Population rejected by the warehouse (P005)
    #[error("[P005] {step} failed: {source}")]
    Transform {
        step: String,
        #[source]
        source: DbError,
    },
}

/// Result type alias for PipelineError
pub type PipelineResult<T> = Result<T, PipelineError>;
