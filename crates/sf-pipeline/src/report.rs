//! Run report: per-step outcomes of a pipeline run

use chrono::{DateTime, Utc};
use serde::Serialize;
use sf_check::{CheckResult, CheckSummary};
use std::fmt;
use std::time::Duration;

/// Pipeline phase a step belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Schema,
    Load,
    Transform,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::Schema, Phase::Load, Phase::Transform];
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Schema => write!(f, "schema"),
            Phase::Load => write!(f, "load"),
            Phase::Transform => write!(f, "transform"),
        }
    }
}

/// Outcome of one step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Success,
    Error,
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepStatus::Success => write!(f, "success"),
            StepStatus::Error => write!(f, "error"),
        }
    }
}

/// One executed step
#[derive(Debug, Clone, Serialize)]
pub struct StepResult {
    pub phase: Phase,

    /// Step name (`drop`, `create`, `load`, `populate_users`, ...)
    pub name: String,

    /// Table the step acts on
    pub table: String,

    pub status: StepStatus,

    /// Rows written, when the warehouse reports it
    pub rows: Option<usize>,

    pub duration_secs: f64,

    pub error: Option<String>,
}

impl StepResult {
    pub fn success(
        phase: Phase,
        name: impl Into<String>,
        table: impl Into<String>,
        rows: Option<usize>,
        duration: Duration,
    ) -> Self {
        Self {
            phase,
            name: name.into(),
            table: table.into(),
            status: StepStatus::Success,
            rows,
            duration_secs: duration.as_secs_f64(),
            error: None,
        }
    }

    pub fn error(
        phase: Phase,
        name: impl Into<String>,
        table: impl Into<String>,
        error: &dyn fmt::Display,
        duration: Duration,
    ) -> Self {
        Self {
            phase,
            name: name.into(),
            table: table.into(),
            status: StepStatus::Error,
            rows: None,
            duration_secs: duration.as_secs_f64(),
            error: Some(error.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == StepStatus::Success
    }
}

/// Check results attached to a run
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub summary: CheckSummary,
    pub results: Vec<CheckResult>,
}

/// Outcome of a `reset`, `etl` or `run` invocation
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Pipeline name from configuration
    pub pipeline: String,

    /// Warehouse type the run executed against
    pub warehouse: String,

    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub elapsed_secs: f64,

    pub steps: Vec<StepResult>,

    /// Error that stopped the run before all phases completed
    pub aborted: Option<String>,

    pub checks: Option<CheckReport>,
}

impl RunReport {
    pub fn new(pipeline: impl Into<String>, warehouse: impl Into<String>) -> Self {
        Self {
            pipeline: pipeline.into(),
            warehouse: warehouse.into(),
            started_at: Utc::now(),
            finished_at: None,
            elapsed_secs: 0.0,
            steps: Vec::new(),
            aborted: None,
            checks: None,
        }
    }

    pub fn push(&mut self, step: StepResult) {
        self.steps.push(step);
    }

    /// Record the error that ends the run early
    pub fn abort(&mut self, error: &dyn fmt::Display) {
        self.aborted = Some(error.to_string());
    }

    /// Stamp the finish time
    pub fn finish(&mut self) {
        let now = Utc::now();
        self.elapsed_secs = (now - self.started_at)
            .to_std()
            .map(|d| d.as_secs_f64())
            .unwrap_or_default();
        self.finished_at = Some(now);
    }

    pub fn steps_in(&self, phase: Phase) -> impl Iterator<Item = &StepResult> {
        self.steps.iter().filter(move |s| s.phase == phase)
    }

    pub fn step(&self, name: &str) -> Option<&StepResult> {
        self.steps.iter().find(|s| s.name == name)
    }

    pub fn failed_steps(&self) -> impl Iterator<Item = &StepResult> {
        self.steps.iter().filter(|s| !s.is_success())
    }

    /// Every step succeeded and the run was not aborted. Check failures do
    /// not count here; see [`RunReport::checks_passed`].
    pub fn steps_succeeded(&self) -> bool {
        self.aborted.is_none() && self.steps.iter().all(StepResult::is_success)
    }

    /// True when no checks ran or all of them passed
    pub fn checks_passed(&self) -> bool {
        self.checks
            .as_ref()
            .map(|c| c.summary.all_passed())
            .unwrap_or(true)
    }

    pub fn success(&self) -> bool {
        self.steps_succeeded() && self.checks_passed()
    }
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
