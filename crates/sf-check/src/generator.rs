//! Check SQL generation
//!
//! Every check is a query that returns the violating rows; an empty result
//! means the check passed.

use serde::Serialize;
use sf_core::sql_utils::quote_ident;
use sf_schema::catalog::{self, FACT_SONGPLAYS, STAG_EVENTS};
use sf_schema::{TableDef, TableKind};
use std::fmt;

/// Kind of data-quality check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckType {
    Unique,
    NotNull,
    RowParity,
}

impl fmt::Display for CheckType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckType::Unique => write!(f, "unique"),
            CheckType::NotNull => write!(f, "not_null"),
            CheckType::RowParity => write!(f, "row_parity"),
        }
    }
}

/// A check ready to run
#[derive(Debug, Clone)]
pub struct Check {
    /// Table being checked
    pub table: String,

    /// Column being checked; `None` for table-level checks
    pub column: Option<String>,

    pub check_type: CheckType,

    /// Query returning violating rows
    pub sql: String,

    /// Human-readable check name
    pub name: String,
}

impl Check {
    /// `unique` check on one column
    pub fn unique(table: &TableDef, column: &str) -> Self {
        Self::on_column(
            CheckType::Unique,
            table,
            column,
            generate_unique_check(table.name, column),
        )
    }

    /// `not_null` check on one column
    pub fn not_null(table: &TableDef, column: &str) -> Self {
        Self::on_column(
            CheckType::NotNull,
            table,
            column,
            generate_not_null_check(table.name, column),
        )
    }

    fn on_column(check_type: CheckType, table: &TableDef, column: &str, sql: String) -> Self {
        Self {
            table: table.name.to_string(),
            column: Some(column.to_string()),
            check_type,
            sql,
            name: format!("{}_{}__{}", check_type, table.name, column),
        }
    }

    /// Build a row parity check between a fact table and its driving staging table
    pub fn row_parity(fact: &TableDef, staging: &TableDef) -> Self {
        Self {
            table: fact.name.to_string(),
            column: None,
            check_type: CheckType::RowParity,
            sql: generate_row_parity_check(fact.name, staging.name),
            name: format!("{}_{}__{}", CheckType::RowParity, fact.name, staging.name),
        }
    }
}

/// Generate SQL for a unique check
///
/// Returns one row per duplicated value.
pub fn generate_unique_check(table: &str, column: &str) -> String {
    let qt = quote_ident(table);
    let qc = quote_ident(column);
    format!("SELECT {qc}, COUNT(*) as cnt\nFROM {qt}\nGROUP BY {qc}\nHAVING COUNT(*) > 1")
}

/// Generate SQL for a not_null check
///
/// Returns rows where the column is NULL.
pub fn generate_not_null_check(table: &str, column: &str) -> String {
    format!(
        "SELECT * FROM {} WHERE {} IS NULL",
        quote_ident(table),
        quote_ident(column)
    )
}

/// Generate SQL for a row parity check
///
/// Returns a single row holding both counts when they differ.
pub fn generate_row_parity_check(fact: &str, staging: &str) -> String {
    format!(
        "SELECT f.cnt AS fact_rows, s.cnt AS staging_rows\n\
         FROM (SELECT COUNT(*) AS cnt FROM {}) f,\n     \
         (SELECT COUNT(*) AS cnt FROM {}) s\n\
         WHERE f.cnt <> s.cnt",
        quote_ident(fact),
        quote_ident(staging)
    )
}

/// Every check derived from the catalog.
///
/// Each dimension key gets `not_null` and `unique`; the fact table must hold
/// exactly one row per staged event.
pub fn catalog_checks() -> Vec<Check> {
    let mut checks = Vec::new();
    for table in catalog::tables_of_kind(TableKind::Dimension) {
        if let Some(key) = table.primary_key() {
            checks.push(Check::not_null(table, key.name));
            checks.push(Check::unique(table, key.name));
        }
    }
    checks.push(Check::row_parity(&FACT_SONGPLAYS, &STAG_EVENTS));
    checks
}

#[cfg(test)]
#[path = "generator_test.rs"]
mod tests;
