//! sf-db - Warehouse abstraction layer for Starflow
//!
//! This crate provides the `Warehouse` trait that every pipeline phase issues
//! statements through, and an embedded DuckDB implementation of it.

pub mod duckdb;
pub mod error;
pub mod traits;

pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use traits::Warehouse;
