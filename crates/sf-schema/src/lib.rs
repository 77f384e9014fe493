//! sf-schema - Schema catalog for Starflow
//!
//! Declares the seven warehouse tables as typed, static definitions and
//! generates every DDL and INSERT-SELECT statement from them, so the
//! lifecycle manager and transform engine never handle hand-written SQL.

pub mod catalog;
pub mod ddl;
pub mod error;
pub mod statement;
pub mod transforms;
pub mod types;

pub use catalog::ALL_TABLES;
pub use error::{SchemaError, SchemaResult};
pub use statement::{DatePart, Expr, InsertSelect, Join, Select, TableRef};
pub use transforms::Transform;
pub use types::{Column, ColumnType, DistStyle, Identity, TableDef, TableKind};
