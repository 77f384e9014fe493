//! Error types for sf-schema

use thiserror::Error;

/// Schema and statement validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Column referenced but not declared on the table (S001)
    #[error("[S001] Unknown column '{column}' on table {table}")]
    UnknownColumn { table: String, column: String },

    /// Unqualified column found on more than one table in scope (S002)
    #[error("[S002] Column '{column}' is ambiguous between {tables}")]
    AmbiguousColumn { column: String, tables: String },

    /// Alias used in an expression but not bound in FROM/JOIN (S003)
    #[error("[S003] Unknown table alias '{alias}'")]
    UnknownAlias { alias: String },

    /// Target column list and projection list differ in length (S004)
    #[error("[S004] INSERT INTO {table} lists {expected} columns but selects {found}")]
    ColumnCountMismatch {
        table: String,
        expected: usize,
        found: usize,
    },

    /// INSERT names a warehouse-assigned identity column (S005)
    #[error("[S005] Column {table}.{column} is assigned by the warehouse and cannot be inserted")]
    IdentityColumnInsert { table: String, column: String },

    /// Table definition is internally inconsistent (S006)
    #[error("[S006] Invalid table definition {table}: {reason}")]
    InvalidTable { table: String, reason: String },
}

/// Result type alias for SchemaError
pub type SchemaResult<T> = Result<T, SchemaError>;
