//! Run command implementation

use anyhow::Result;

use crate::cli::{EtlArgs, GlobalArgs};
use crate::commands::common::finish_report;
use crate::commands::etl::run_options;
use crate::context::RuntimeContext;

/// Reset then etl, reported as one run
pub async fn execute(args: &EtlArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let report = ctx.pipeline()?.run(&run_options(args, &ctx)).await;
    finish_report(&report, args.output)
}
