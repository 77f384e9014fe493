//! sf-check - Data-quality checks for Starflow
//!
//! Key checks are derived from the schema catalog so they cover engines
//! that accept but do not enforce PRIMARY KEY constraints.

pub mod generator;
pub mod runner;

pub use generator::{
    catalog_checks, generate_not_null_check, generate_row_parity_check, generate_unique_check,
    Check, CheckType,
};
pub use runner::{CheckResult, CheckRunner, CheckSummary};
