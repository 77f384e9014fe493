//! Column, table, and distribution types for the catalog

use crate::error::{SchemaError, SchemaResult};
use sf_core::Dialect;
use std::collections::HashSet;
use std::fmt;

/// Semantic column type, rendered per dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    SmallInt,
    Int,
    BigInt,
    /// 8-byte floating point
    Float,
    Varchar,
    Timestamp,
}

impl ColumnType {
    /// Render the type name for `dialect`.
    ///
    /// DuckDB's `FLOAT` is single precision, so doubles are spelled out there.
    pub fn sql_type(self, dialect: Dialect) -> &'static str {
        match (self, dialect) {
            (ColumnType::SmallInt, _) => "SMALLINT",
            (ColumnType::Int, _) => "INTEGER",
            (ColumnType::BigInt, _) => "BIGINT",
            (ColumnType::Float, Dialect::Redshift) => "FLOAT",
            (ColumnType::Float, Dialect::DuckDb) => "DOUBLE",
            (ColumnType::Varchar, _) => "VARCHAR",
            (ColumnType::Timestamp, _) => "TIMESTAMP",
        }
    }

    /// Whether the type is an integer type (usable for identity columns)
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            ColumnType::SmallInt | ColumnType::Int | ColumnType::BigInt
        )
    }
}

/// How a table's rows are spread across compute nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DistStyle {
    /// Round-robin; staging tables use it for ingest parallelism
    Even,
    /// Full copy on every node; small dimensions use it for join locality
    All,
    /// Engine default (no clause emitted)
    Auto,
}

impl DistStyle {
    /// Trailing DDL clause for `dialect`, if any.
    pub fn clause(self, dialect: Dialect) -> Option<&'static str> {
        match (self, dialect) {
            (_, Dialect::DuckDb) => None,
            (DistStyle::Even, Dialect::Redshift) => Some("DISTSTYLE EVEN"),
            (DistStyle::All, Dialect::Redshift) => Some("DISTSTYLE ALL"),
            (DistStyle::Auto, Dialect::Redshift) => None,
        }
    }
}

/// Role of a table in the star schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    Staging,
    Dimension,
    Fact,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableKind::Staging => write!(f, "staging"),
            TableKind::Dimension => write!(f, "dimension"),
            TableKind::Fact => write!(f, "fact"),
        }
    }
}

/// Auto-incrementing counter assigned by the warehouse at insert time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identity {
    pub seed: i64,
    pub step: i64,
}

/// A single column definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub ty: ColumnType,
    pub nullable: bool,
    pub primary_key: bool,
    pub identity: Option<Identity>,
}

impl Column {
    /// Nullable column
    pub const fn new(name: &'static str, ty: ColumnType) -> Self {
        Self {
            name,
            ty,
            nullable: true,
            primary_key: false,
            identity: None,
        }
    }

    /// NOT NULL column
    pub const fn required(name: &'static str, ty: ColumnType) -> Self {
        Self {
            nullable: false,
            ..Self::new(name, ty)
        }
    }

    /// Primary key column (implies NOT NULL)
    pub const fn primary_key(name: &'static str, ty: ColumnType) -> Self {
        Self {
            nullable: false,
            primary_key: true,
            ..Self::new(name, ty)
        }
    }

    /// Mark the column as warehouse-assigned, counting from `seed` by `step`
    pub const fn identity(self, seed: i64, step: i64) -> Self {
        Self {
            identity: Some(Identity { seed, step }),
            ..self
        }
    }
}

/// A warehouse table: name, role, distribution, and ordered columns
#[derive(Debug, PartialEq, Eq)]
pub struct TableDef {
    pub name: &'static str,
    pub kind: TableKind,
    pub dist_style: DistStyle,
    pub columns: &'static [Column],
}

impl TableDef {
    /// Look up a column by exact name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// The primary key column, if the table declares one
    pub fn primary_key(&self) -> Option<&Column> {
        self.columns.iter().find(|c| c.primary_key)
    }

    /// The warehouse-assigned identity column, if any
    pub fn identity_column(&self) -> Option<&Column> {
        self.columns.iter().find(|c| c.identity.is_some())
    }

    /// Column names in declaration order
    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }

    /// Check the definition is internally consistent.
    ///
    /// Names are compared case-insensitively because Redshift folds
    /// identifiers to lower case.
    pub fn validate(&self) -> SchemaResult<()> {
        let invalid = |reason: String| SchemaError::InvalidTable {
            table: self.name.to_string(),
            reason,
        };

        if self.columns.is_empty() {
            return Err(invalid("no columns declared".to_string()));
        }

        let mut seen = HashSet::new();
        for column in self.columns {
            if !seen.insert(column.name.to_ascii_lowercase()) {
                return Err(invalid(format!("duplicate column '{}'", column.name)));
            }
        }

        let keys = self.columns.iter().filter(|c| c.primary_key).count();
        if keys > 1 {
            return Err(invalid(format!("{keys} primary key columns")));
        }
        if self.kind == TableKind::Staging && keys > 0 {
            return Err(invalid("staging tables carry no primary key".to_string()));
        }

        for column in self.columns {
            if let Some(identity) = column.identity {
                if !column.ty.is_integer() || !column.primary_key {
                    return Err(invalid(format!(
                        "identity column '{}' must be an integer primary key",
                        column.name
                    )));
                }
                if identity.step <= 0 {
                    return Err(invalid(format!(
                        "identity column '{}' must count upwards",
                        column.name
                    )));
                }
            }
        }

        Ok(())
    }
}

impl fmt::Display for TableDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
