//! Reset command implementation

use anyhow::Result;

use crate::cli::{GlobalArgs, ResetArgs};
use crate::commands::common::finish_report;
use crate::context::RuntimeContext;

/// Drop and recreate every table
pub async fn execute(args: &ResetArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let report = ctx.pipeline()?.reset().await;
    finish_report(&report, args.output)
}
