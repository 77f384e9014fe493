//! CLI command implementations

pub(crate) mod check;
pub(crate) mod common;
pub(crate) mod etl;
pub(crate) mod plan;
pub(crate) mod reset;
pub(crate) mod run;
