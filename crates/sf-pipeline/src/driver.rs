//! Pipeline driver: sequences the schema, load and transform phases
//!
//! Ordering is drops, creates, both loads, dimension populations, fact
//! population. The two loads run concurrently and must both succeed before
//! any population starts; the dimension populations run concurrently.

use crate::error::PipelineResult;
use crate::lifecycle::SchemaManager;
use crate::loader::{run_load, LoadConfig};
use crate::report::{CheckReport, Phase, RunReport, StepResult};
use crate::transform::TransformEngine;
use sf_check::{catalog_checks, CheckRunner};
use sf_db::Warehouse;
use std::sync::Arc;
use std::time::Instant;

/// Options for `etl` and `run`
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Run data-quality checks after the transform phase
    pub checks: bool,
    /// Violating rows kept per failed check
    pub sample_limit: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            checks: true,
            sample_limit: sf_check::runner::DEFAULT_SAMPLE_LIMIT,
        }
    }
}

/// A configured pipeline bound to one warehouse
pub struct Pipeline {
    name: String,
    warehouse: Arc<dyn Warehouse>,
    load_config: LoadConfig,
}

impl Pipeline {
    pub fn new(warehouse: Arc<dyn Warehouse>, load_config: LoadConfig) -> Self {
        Self {
            name: "starflow".to_string(),
            warehouse,
            load_config,
        }
    }

    /// Name recorded on run reports
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn warehouse(&self) -> &dyn Warehouse {
        self.warehouse.as_ref()
    }

    pub fn load_config(&self) -> &LoadConfig {
        &self.load_config
    }

    fn new_report(&self) -> RunReport {
        RunReport::new(&self.name, self.warehouse.db_type())
    }

    /// Drop and recreate every table
    pub async fn reset(&self) -> RunReport {
        let mut report = self.new_report();
        if let Err(e) = self.reset_into(&mut report).await {
            report.abort(&e);
        }
        report.finish();
        report
    }

    /// Load staging, populate the star schema, then optionally check it
    pub async fn etl(&self, options: &RunOptions) -> RunReport {
        let mut report = self.new_report();
        self.etl_into(&mut report, options).await;
        report.finish();
        report
    }

    /// `reset` followed by `etl`, on one report
    pub async fn run(&self, options: &RunOptions) -> RunReport {
        let mut report = self.new_report();
        match self.reset_into(&mut report).await {
            Ok(()) => self.etl_into(&mut report, options).await,
            Err(e) => report.abort(&e),
        }
        report.finish();
        report
    }

    /// Run the catalog checks against the current warehouse contents
    pub async fn check(&self, sample_limit: usize) -> CheckReport {
        log::info!("Running data-quality checks");
        let (results, summary) = CheckRunner::new(self.warehouse.as_ref())
            .with_sample_limit(sample_limit)
            .run_all(&catalog_checks())
            .await;
        CheckReport { summary, results }
    }

    async fn reset_into(&self, report: &mut RunReport) -> PipelineResult<()> {
        log::info!("Schema phase on {}", self.warehouse.db_type());
        SchemaManager::new(self.warehouse.as_ref())
            .reset(report)
            .await
    }

    async fn etl_into(&self, report: &mut RunReport, options: &RunOptions) {
        if let Err(e) = self.load_into(report).await {
            report.abort(&e);
            return;
        }

        log::info!("Transform phase");
        let steps = TransformEngine::new(self.warehouse.as_ref()).run_all().await;
        report.steps.extend(steps);

        if options.checks {
            report.checks = Some(self.check(options.sample_limit).await);
        }
    }

    async fn load_into(&self, report: &mut RunReport) -> PipelineResult<()> {
        log::info!("Load phase");
        let warehouse = self.warehouse.as_ref();
        let credential = &self.load_config.credential;
        let events = self.load_config.events_job();
        let songs = self.load_config.songs_job();

        let start = Instant::now();
        let (events_result, songs_result) = tokio::join!(
            run_load(warehouse, &events, credential),
            run_load(warehouse, &songs, credential)
        );

        let mut first_error = None;
        for (job, result) in [(&events, events_result), (&songs, songs_result)] {
            match result {
                Ok(step) => report.push(step),
                Err(e) => {
                    log::error!("{e}");
                    report.push(StepResult::error(
                        Phase::Load,
                        "load",
                        job.table.name,
                        &e,
                        start.elapsed(),
                    ));
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "driver_test.rs"]
mod tests;
