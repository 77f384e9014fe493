//! Check execution

use crate::generator::{Check, CheckType};
use serde::Serialize;
use sf_db::Warehouse;
use std::time::{Duration, Instant};

/// Default number of violating rows fetched per failed check
pub const DEFAULT_SAMPLE_LIMIT: usize = 5;

/// Result of a single check execution
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    /// Check name
    pub name: String,

    /// Table checked
    pub table: String,

    /// Column checked, if any
    pub column: Option<String>,

    pub check_type: CheckType,

    /// Whether the check passed
    pub passed: bool,

    /// Number of violating rows (0 if passed)
    pub failure_count: usize,

    /// Sample violating rows as formatted strings
    pub sample_failures: Vec<String>,

    /// Execution time
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,

    /// Error message if execution failed
    pub error: Option<String>,
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

impl CheckResult {
    /// Create a passed check result
    pub fn pass(check: &Check, duration: Duration) -> Self {
        Self::new(check, true, 0, Vec::new(), duration, None)
    }

    /// Create a failed check result
    pub fn fail(
        check: &Check,
        failure_count: usize,
        sample_failures: Vec<String>,
        duration: Duration,
    ) -> Self {
        Self::new(check, false, failure_count, sample_failures, duration, None)
    }

    /// Create an error check result
    pub fn error(check: &Check, error: String, duration: Duration) -> Self {
        Self::new(check, false, 0, Vec::new(), duration, Some(error))
    }

    fn new(
        check: &Check,
        passed: bool,
        failure_count: usize,
        sample_failures: Vec<String>,
        duration: Duration,
        error: Option<String>,
    ) -> Self {
        Self {
            name: check.name.clone(),
            table: check.table.clone(),
            column: check.column.clone(),
            check_type: check.check_type,
            passed,
            failure_count,
            sample_failures,
            duration,
            error,
        }
    }
}

/// Summary of a check run
#[derive(Debug, Clone, Serialize)]
pub struct CheckSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,

    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,
}

impl CheckSummary {
    /// Create a summary from check results
    pub fn from_results(results: &[CheckResult], duration: Duration) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed).count();
        let errors = results.iter().filter(|r| r.error.is_some()).count();
        let failed = results
            .iter()
            .filter(|r| !r.passed && r.error.is_none())
            .count();

        Self {
            total,
            passed,
            failed,
            errors,
            duration,
        }
    }

    /// Check if every check passed
    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.errors == 0
    }
}

/// Runs checks against a warehouse
pub struct CheckRunner<'a> {
    warehouse: &'a dyn Warehouse,
    sample_limit: usize,
}

impl<'a> CheckRunner<'a> {
    /// Create a new check runner
    pub fn new(warehouse: &'a dyn Warehouse) -> Self {
        Self {
            warehouse,
            sample_limit: DEFAULT_SAMPLE_LIMIT,
        }
    }

    /// Set how many violating rows are fetched per failed check
    pub fn with_sample_limit(mut self, sample_limit: usize) -> Self {
        self.sample_limit = sample_limit;
        self
    }

    /// Run a single check
    pub async fn run_check(&self, check: &Check) -> CheckResult {
        let start = Instant::now();
        log::debug!("Running check {}", check.name);

        match self.warehouse.query_count(&check.sql).await {
            Ok(0) => CheckResult::pass(check, start.elapsed()),
            Ok(count) => {
                let duration = start.elapsed();
                let sample_failures = self
                    .warehouse
                    .query_sample_rows(&check.sql, self.sample_limit)
                    .await
                    .unwrap_or_default();
                log::warn!("Check {} failed: {} violating rows", check.name, count);
                CheckResult::fail(check, count, sample_failures, duration)
            }
            Err(e) => {
                log::warn!("Check {} errored: {}", check.name, e);
                CheckResult::error(check, e.to_string(), start.elapsed())
            }
        }
    }

    /// Run checks in order
    pub async fn run_checks(&self, checks: &[Check]) -> Vec<CheckResult> {
        let mut results = Vec::with_capacity(checks.len());

        for check in checks {
            results.push(self.run_check(check).await);
        }

        results
    }

    /// Run all checks and return summary
    pub async fn run_all(&self, checks: &[Check]) -> (Vec<CheckResult>, CheckSummary) {
        let start = Instant::now();
        let results = self.run_checks(checks).await;
        let summary = CheckSummary::from_results(&results, start.elapsed());

        (results, summary)
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
