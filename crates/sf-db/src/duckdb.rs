//! DuckDB warehouse backend implementation

use crate::error::{DbError, DbResult};
use crate::traits::Warehouse;
use async_trait::async_trait;
use duckdb::types::ValueRef;
use duckdb::Connection;
use sf_core::sql_utils::{escape_sql_string, split_qualified_name};
use sf_core::Dialect;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Embedded DuckDB warehouse
///
/// One connection guarded by a mutex: statements issued concurrently are
/// serialized, which keeps each one atomic.
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path).map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    fn execute_sync(&self, sql: &str) -> DbResult<usize> {
        log::debug!("duckdb execute:\n{sql}");
        let conn = self.lock()?;
        conn.execute(sql, []).map_err(DbError::from)
    }

    fn execute_batch_sync(&self, sql: &str) -> DbResult<()> {
        log::debug!("duckdb execute_batch:\n{sql}");
        let conn = self.lock()?;
        conn.execute_batch(sql).map_err(DbError::from)
    }

    fn query_count_sync(&self, sql: &str) -> DbResult<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM ({})", sql), [], |row| {
            row.get(0)
        })?;
        usize::try_from(count).map_err(|e| DbError::Internal(e.to_string()))
    }

    fn relation_exists_sync(&self, name: &str) -> DbResult<bool> {
        let conn = self.lock()?;
        let (schema, table) = split_qualified_name(name);

        let sql = format!(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = '{}' AND table_name = '{}'",
            escape_sql_string(schema),
            escape_sql_string(table)
        );

        let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count > 0)
    }

    fn query_rows_sync(&self, sql: &str) -> DbResult<Vec<Vec<Option<String>>>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql)?;
        // column_count() is only valid after execution, so read it per row
        let rows = stmt
            .query_map([], |row| {
                let col_count = row.as_ref().column_count();
                Ok((0..col_count).map(|i| column_as_string(row, i)).collect())
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

/// Read a column value as text.
///
/// Text, floating point and boolean values are matched directly; every
/// integer width goes through `i64`. Timestamps and other types should be
/// `CAST(... AS VARCHAR)` by the query; they come back as `"?"`.
fn column_as_string(row: &duckdb::Row<'_>, idx: usize) -> Option<String> {
    match row.get_ref(idx) {
        Ok(ValueRef::Null) => return None,
        Ok(ValueRef::Text(bytes)) => return Some(String::from_utf8_lossy(bytes).into_owned()),
        Ok(ValueRef::Double(f)) => return Some(f.to_string()),
        Ok(ValueRef::Float(f)) => return Some(f.to_string()),
        Ok(ValueRef::Boolean(b)) => return Some(b.to_string()),
        _ => {}
    }
    if let Ok(n) = row.get::<_, i64>(idx) {
        return Some(n.to_string());
    }
    Some("?".to_string())
}

#[async_trait]
impl Warehouse for DuckDbBackend {
    async fn execute(&self, sql: &str) -> DbResult<usize> {
        self.execute_sync(sql)
    }

    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.execute_batch_sync(sql)
    }

    async fn relation_exists(&self, name: &str) -> DbResult<bool> {
        self.relation_exists_sync(name)
    }

    async fn query_count(&self, sql: &str) -> DbResult<usize> {
        self.query_count_sync(sql)
    }

    async fn query_sample_rows(&self, sql: &str, limit: usize) -> DbResult<Vec<String>> {
        let rows = self.query_rows_sync(&format!("SELECT * FROM ({}) LIMIT {}", sql, limit))?;
        Ok(rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|v| v.unwrap_or_else(|| "null".to_string()))
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .collect())
    }

    async fn query_rows(&self, sql: &str) -> DbResult<Vec<Vec<Option<String>>>> {
        self.query_rows_sync(sql)
    }

    fn dialect(&self) -> Dialect {
        Dialect::DuckDb
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
