//! Warehouse trait definition

use crate::error::DbResult;
use async_trait::async_trait;
use sf_core::Dialect;

/// A warehouse connection that accepts SQL statements
///
/// Implementations must be Send + Sync so the driver can issue independent
/// statements from concurrent tasks.
#[async_trait]
pub trait Warehouse: Send + Sync {
    /// Execute a single statement, returns affected rows
    async fn execute(&self, sql: &str) -> DbResult<usize>;

    /// Execute multiple `;`-separated statements
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Check if a table exists
    async fn relation_exists(&self, name: &str) -> DbResult<bool>;

    /// Count the rows a query returns
    async fn query_count(&self, sql: &str) -> DbResult<usize>;

    /// Return up to `limit` rows of a query, each as a comma-separated string
    async fn query_sample_rows(&self, sql: &str, limit: usize) -> DbResult<Vec<String>>;

    /// Return every row of a query; SQL NULL maps to `None`
    async fn query_rows(&self, sql: &str) -> DbResult<Vec<Vec<Option<String>>>>;

    /// SQL dialect statements must be rendered in for this warehouse
    fn dialect(&self) -> Dialect;

    /// Warehouse type identifier for logging
    fn db_type(&self) -> &'static str;
}
