//! Etl command implementation

use anyhow::Result;
use sf_pipeline::RunOptions;

use crate::cli::{EtlArgs, GlobalArgs};
use crate::commands::common::finish_report;
use crate::context::RuntimeContext;

pub(crate) fn run_options(args: &EtlArgs, ctx: &RuntimeContext) -> RunOptions {
    RunOptions {
        checks: ctx.config.checks.enabled && !args.skip_checks,
        sample_limit: ctx.config.checks.sample_limit,
    }
}

/// Load staging and populate the star schema on existing tables
pub async fn execute(args: &EtlArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let report = ctx.pipeline()?.etl(&run_options(args, &ctx)).await;
    finish_report(&report, args.output)
}
