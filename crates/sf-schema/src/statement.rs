//! Typed INSERT ... SELECT statements
//!
//! Transform statements are built from catalog table references rather than
//! SQL text. `InsertSelect::validate` resolves every column against the
//! catalog before anything is sent to the warehouse.

use crate::error::{SchemaError, SchemaResult};
use crate::types::TableDef;
use sf_core::sql_utils::{quote_column, quote_ident};
use std::fmt;

/// Calendar part pulled out of a timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatePart {
    Hour,
    Day,
    /// ISO week of year
    Week,
    Month,
    Year,
    /// Day of week, 0 = Sunday through 6 = Saturday
    DayOfWeek,
}

impl DatePart {
    fn keyword(self) -> &'static str {
        match self {
            DatePart::Hour => "HOUR",
            DatePart::Day => "DAY",
            DatePart::Week => "WEEK",
            DatePart::Month => "MONTH",
            DatePart::Year => "YEAR",
            DatePart::DayOfWeek => "DOW",
        }
    }
}

/// Column reference, optionally qualified by a table alias
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    pub qualifier: Option<&'static str>,
    pub column: &'static str,
}

/// Scalar or boolean expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Column(ColumnRef),
    Extract { part: DatePart, expr: Box<Expr> },
    IsNotNull(Box<Expr>),
    Eq(Box<Expr>, Box<Expr>),
    And(Vec<Expr>),
}

impl Expr {
    /// Unqualified column
    pub fn col(column: &'static str) -> Self {
        Expr::Column(ColumnRef {
            qualifier: None,
            column,
        })
    }

    /// Alias-qualified column (`e.ts`)
    pub fn qcol(qualifier: &'static str, column: &'static str) -> Self {
        Expr::Column(ColumnRef {
            qualifier: Some(qualifier),
            column,
        })
    }

    pub fn extract(self, part: DatePart) -> Self {
        Expr::Extract {
            part,
            expr: Box::new(self),
        }
    }

    pub fn is_not_null(self) -> Self {
        Expr::IsNotNull(Box::new(self))
    }

    pub fn equals(self, other: Expr) -> Self {
        Expr::Eq(Box::new(self), Box::new(other))
    }

    pub fn and(terms: Vec<Expr>) -> Self {
        Expr::And(terms)
    }

    fn columns<'a>(&'a self, out: &mut Vec<&'a ColumnRef>) {
        match self {
            Expr::Column(c) => out.push(c),
            Expr::Extract { expr, .. } | Expr::IsNotNull(expr) => expr.columns(out),
            Expr::Eq(l, r) => {
                l.columns(out);
                r.columns(out);
            }
            Expr::And(terms) => terms.iter().for_each(|t| t.columns(out)),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Column(c) => f.write_str(&quote_column(c.qualifier, c.column)),
            Expr::Extract { part, expr } => write!(f, "EXTRACT({} FROM {})", part.keyword(), expr),
            Expr::IsNotNull(expr) => write!(f, "{expr} IS NOT NULL"),
            Expr::Eq(l, r) => write!(f, "{l} = {r}"),
            Expr::And(terms) => {
                let rendered: Vec<String> = terms.iter().map(|t| t.to_string()).collect();
                f.write_str(&rendered.join("\n  AND "))
            }
        }
    }
}

/// A catalog table bound in FROM or JOIN
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRef {
    pub table: &'static TableDef,
    pub alias: Option<&'static str>,
}

impl TableRef {
    pub fn new(table: &'static TableDef) -> Self {
        Self { table, alias: None }
    }

    pub fn aliased(table: &'static TableDef, alias: &'static str) -> Self {
        Self {
            table,
            alias: Some(alias),
        }
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.alias {
            Some(alias) => write!(f, "{} AS {}", quote_ident(self.table.name), alias),
            None => f.write_str(&quote_ident(self.table.name)),
        }
    }
}

/// `LEFT JOIN <table> ON <condition>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    pub table: TableRef,
    pub on: Expr,
}

/// SELECT over catalog tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Select {
    pub distinct: bool,
    pub projections: Vec<Expr>,
    pub from: TableRef,
    pub joins: Vec<Join>,
    pub filter: Option<Expr>,
}

impl Select {
    fn scope(&self) -> Vec<TableRef> {
        std::iter::once(self.from)
            .chain(self.joins.iter().map(|j| j.table))
            .collect()
    }

    /// Resolve every column reference against the tables in scope.
    pub fn validate(&self) -> SchemaResult<()> {
        let scope = self.scope();
        let mut refs = Vec::new();
        for expr in &self.projections {
            expr.columns(&mut refs);
        }
        for join in &self.joins {
            join.on.columns(&mut refs);
        }
        if let Some(filter) = &self.filter {
            filter.columns(&mut refs);
        }

        for column in refs {
            resolve(&scope, column)?;
        }
        Ok(())
    }
}

impl fmt::Display for Select {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let projections: Vec<String> = self.projections.iter().map(|p| p.to_string()).collect();
        let keyword = if self.distinct {
            "SELECT DISTINCT"
        } else {
            "SELECT"
        };
        write!(f, "{keyword} {}\nFROM {}", projections.join(",\n       "), self.from)?;
        for join in &self.joins {
            write!(f, "\nLEFT JOIN {}\n  ON {}", join.table, join.on)?;
        }
        if let Some(filter) = &self.filter {
            write!(f, "\nWHERE {filter}")?;
        }
        Ok(())
    }
}

fn resolve(scope: &[TableRef], column: &ColumnRef) -> SchemaResult<&'static TableDef> {
    match column.qualifier {
        Some(alias) => {
            let bound = scope
                .iter()
                .find(|t| t.alias == Some(alias))
                .ok_or_else(|| SchemaError::UnknownAlias {
                    alias: alias.to_string(),
                })?;
            bound
                .table
                .column(column.column)
                .map(|_| bound.table)
                .ok_or_else(|| SchemaError::UnknownColumn {
                    table: bound.table.name.to_string(),
                    column: column.column.to_string(),
                })
        }
        None => {
            let owners: Vec<&'static TableDef> = scope
                .iter()
                .map(|t| t.table)
                .filter(|t| t.column(column.column).is_some())
                .collect();
            match owners.as_slice() {
                [owner] => Ok(*owner),
                [] => Err(SchemaError::UnknownColumn {
                    table: scope
                        .iter()
                        .map(|t| t.table.name)
                        .collect::<Vec<_>>()
                        .join(", "),
                    column: column.column.to_string(),
                }),
                many => Err(SchemaError::AmbiguousColumn {
                    column: column.column.to_string(),
                    tables: many.iter().map(|t| t.name).collect::<Vec<_>>().join(", "),
                }),
            }
        }
    }
}

/// `INSERT INTO <target> (<columns>) <select>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertSelect {
    pub target: &'static TableDef,
    pub columns: Vec<&'static str>,
    pub select: Select,
}

impl InsertSelect {
    /// Check the statement against the catalog: target columns exist and
    /// are insertable, the projection lines up, and the SELECT resolves.
    pub fn validate(&self) -> SchemaResult<()> {
        for name in &self.columns {
            let column = self
                .target
                .column(name)
                .ok_or_else(|| SchemaError::UnknownColumn {
                    table: self.target.name.to_string(),
                    column: name.to_string(),
                })?;
            if column.identity.is_some() {
                return Err(SchemaError::IdentityColumnInsert {
                    table: self.target.name.to_string(),
                    column: name.to_string(),
                });
            }
        }

        if self.columns.len() != self.select.projections.len() {
            return Err(SchemaError::ColumnCountMismatch {
                table: self.target.name.to_string(),
                expected: self.columns.len(),
                found: self.select.projections.len(),
            });
        }

        self.select.validate()
    }

    /// Render the statement. The same text runs on every supported dialect.
    pub fn to_sql(&self) -> String {
        let columns: Vec<String> = self.columns.iter().map(|c| quote_ident(c)).collect();
        format!(
            "INSERT INTO {} ({})\n{}",
            quote_ident(self.target.name),
            columns.join(", "),
            self.select
        )
    }
}

#[cfg(test)]
#[path = "statement_test.rs"]
mod tests;
