//! sf-pipeline - Pipeline phases for Starflow
//!
//! A run is three phases against one warehouse: the schema phase drops and
//! recreates every catalog table, the load phase bulk-ingests both staging
//! tables, and the transform phase populates the dimensions and then the
//! fact table. [`Pipeline`] sequences them and returns a [`RunReport`].

pub mod driver;
pub mod error;
pub mod jsonpaths;
pub mod lifecycle;
pub mod loader;
pub mod plan;
pub mod report;
pub mod transform;

#[cfg(test)]
pub(crate) mod test_support;

pub use driver::{Pipeline, RunOptions};
pub use error::{PipelineError, PipelineResult};
pub use lifecycle::SchemaManager;
pub use loader::{
    load_staging_events, load_staging_songs, Credential, FormatDescriptor, LoadConfig, LoadJob,
    Source, TimeFormat,
};
pub use plan::{plan, Plan, PlannedStatement};
pub use report::{CheckReport, Phase, RunReport, StepResult, StepStatus};
pub use transform::TransformEngine;
