//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Starflow - load song-play logs and build a star schema
#[derive(Parser, Debug)]
#[command(name = "sf")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Target from the config's `targets` section (falls back to SF_TARGET)
    #[arg(short, long, global = true)]
    pub target: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Drop and recreate every table
    Reset(ResetArgs),

    /// Load staging tables and populate the star schema
    Etl(EtlArgs),

    /// Reset, then etl
    Run(EtlArgs),

    /// Print the SQL a run would execute
    Plan(PlanArgs),

    /// Run data-quality checks against the current tables
    Check(CheckArgs),
}

/// Output formats for run-style commands
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable step list
    #[default]
    Text,
    /// Run report as JSON
    Json,
}

/// Arguments for the reset command
#[derive(Args, Debug)]
pub struct ResetArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments for the etl and run commands
#[derive(Args, Debug)]
pub struct EtlArgs {
    /// Skip data-quality checks after the transform phase
    #[arg(long)]
    pub skip_checks: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Which phases `plan` renders
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanPhase {
    Schema,
    Load,
    Transform,
    All,
}

/// SQL dialects `plan` can render
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialectArg {
    Redshift,
    Duckdb,
}

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Dialect to render (default: the config's `dialect`)
    #[arg(short, long, value_enum)]
    pub dialect: Option<DialectArg>,

    /// Phase to render
    #[arg(long, value_enum, default_value = "all")]
    pub phase: PlanPhase,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Violating rows shown per failed check (default: from config)
    #[arg(long)]
    pub sample_limit: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
