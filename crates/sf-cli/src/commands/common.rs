//! Shared output and exit-code handling for commands

use anyhow::{Context, Result};
use sf_pipeline::{CheckReport, RunReport, StepStatus};
use std::fmt;

use crate::cli::OutputFormat;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that RAII destructors (the warehouse connection) run first.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only; main.rs never prints it
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// A step failed or the run aborted
pub(crate) const EXIT_RUN_FAILED: i32 = 1;
/// Every step succeeded but a data-quality check did not
pub(crate) const EXIT_CHECKS_FAILED: i32 = 2;

pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

/// Print the report in the requested format, then map it to an exit code
pub(crate) fn finish_report(report: &RunReport, output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Json => print_json(report)?,
        OutputFormat::Text => print_report(report),
    }
    exit_for(report)
}

pub(crate) fn exit_for(report: &RunReport) -> Result<()> {
    if !report.steps_succeeded() {
        return Err(ExitCode(EXIT_RUN_FAILED).into());
    }
    if !report.checks_passed() {
        return Err(ExitCode(EXIT_CHECKS_FAILED).into());
    }
    Ok(())
}

fn print_report(report: &RunReport) {
    let mut phase = None;
    for step in &report.steps {
        if phase != Some(step.phase) {
            println!("\n{} phase", step.phase);
            phase = Some(step.phase);
        }
        let millis = (step.duration_secs * 1000.0).round() as u64;
        match step.status {
            StepStatus::Success => match step.rows {
                Some(rows) => println!(
                    "  \u{2713} {} {} ({} rows) [{}ms]",
                    step.name, step.table, rows, millis
                ),
                None => println!("  \u{2713} {} {} [{}ms]", step.name, step.table, millis),
            },
            StepStatus::Error => println!(
                "  \u{2717} {} {} - {} [{}ms]",
                step.name,
                step.table,
                step.error.as_deref().unwrap_or("unknown error"),
                millis
            ),
        }
    }

    if let Some(checks) = &report.checks {
        println!("\ncheck phase");
        print_checks(checks);
    }

    println!();
    if let Some(reason) = &report.aborted {
        println!("Run aborted: {reason}");
    }
    let failed = report.failed_steps().count();
    println!(
        "Steps: {}, Failed: {} [{:.2}s]",
        report.steps.len(),
        failed,
        report.elapsed_secs
    );
}

pub(crate) fn print_checks(checks: &CheckReport) {
    for result in &checks.results {
        let millis = result.duration.as_millis();
        if result.passed {
            println!("  \u{2713} {} [{}ms]", result.name, millis);
        } else if let Some(error) = &result.error {
            println!("  \u{2717} {} - {} [{}ms]", result.name, error, millis);
        } else {
            println!(
                "  \u{2717} {} ({} failures) [{}ms]",
                result.name, result.failure_count, millis
            );
            if !result.sample_failures.is_empty() {
                println!("    Sample failing rows:");
                for (i, row) in result.sample_failures.iter().enumerate() {
                    println!("      {}. {}", i + 1, row);
                }
                if result.failure_count > result.sample_failures.len() {
                    println!(
                        "      ... and {} more",
                        result.failure_count - result.sample_failures.len()
                    );
                }
            }
        }
    }
    println!(
        "  Passed: {}, Failed: {}",
        checks.summary.passed,
        checks.summary.failed + checks.summary.errors
    );
}
