//! Check command implementation

use anyhow::Result;

use crate::cli::{CheckArgs, GlobalArgs, OutputFormat};
use crate::commands::common::{print_checks, print_json, ExitCode, EXIT_CHECKS_FAILED};
use crate::context::RuntimeContext;

/// Run the catalog checks against the current tables
pub async fn execute(args: &CheckArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let sample_limit = args.sample_limit.unwrap_or(ctx.config.checks.sample_limit);
    let checks = ctx.pipeline()?.check(sample_limit).await;

    match args.output {
        OutputFormat::Json => print_json(&checks)?,
        OutputFormat::Text => {
            println!("Running {} checks...\n", checks.summary.total);
            print_checks(&checks);
        }
    }

    if checks.summary.all_passed() {
        Ok(())
    } else {
        Err(ExitCode(EXIT_CHECKS_FAILED).into())
    }
}
