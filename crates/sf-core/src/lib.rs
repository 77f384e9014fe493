//! sf-core - Core library for Starflow
//!
//! This crate provides the project configuration (`starflow.yml`), the SQL
//! dialect selector, and identifier/literal quoting helpers shared by the
//! schema, loader, and check crates.

pub mod config;
pub mod error;
pub mod sql_utils;

pub use config::{
    ChecksConfig, Config, DatabaseConfig, DbType, Dialect, IamRoleConfig, S3Config, TargetConfig,
};
pub use error::{CoreError, CoreResult};
