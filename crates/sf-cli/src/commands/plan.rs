//! Plan command implementation

use anyhow::{Context, Result};
use sf_core::Dialect;
use sf_pipeline::{LoadConfig, Phase};

use crate::cli::{DialectArg, GlobalArgs, OutputFormat, PlanArgs, PlanPhase};
use crate::commands::common::print_json;
use crate::context::{load_config, project_root};

fn phases(phase: PlanPhase) -> Vec<Phase> {
    match phase {
        PlanPhase::Schema => vec![Phase::Schema],
        PlanPhase::Load => vec![Phase::Load],
        PlanPhase::Transform => vec![Phase::Transform],
        PlanPhase::All => Phase::ALL.to_vec(),
    }
}

/// Print every statement a run would issue, without connecting
pub async fn execute(args: &PlanArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    let target = sf_core::Config::resolve_target(global.target.as_deref());
    let load_config = LoadConfig::from_config(&config, target.as_deref())
        .context("Failed to resolve load configuration")?
        .anchored(&project_root(global));

    let dialect = match args.dialect {
        Some(DialectArg::Redshift) => Dialect::Redshift,
        Some(DialectArg::Duckdb) => Dialect::DuckDb,
        None => config.dialect,
    };

    let plan = sf_pipeline::plan(dialect, &load_config, &phases(args.phase))
        .context("Failed to render plan")?;

    match args.output {
        OutputFormat::Json => print_json(&plan)?,
        OutputFormat::Text => print!("{plan}"),
    }
    Ok(())
}
