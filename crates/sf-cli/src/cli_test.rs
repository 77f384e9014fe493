use super::*;

#[test]
fn test_cli_definition_is_valid() {
    use clap::CommandFactory;
    Cli::command().debug_assert();
}

#[test]
fn test_parse_run_with_globals() {
    let cli = Cli::try_parse_from([
        "sf",
        "-p",
        "project",
        "--target",
        "local",
        "run",
        "--skip-checks",
        "--output",
        "json",
    ])
    .unwrap();

    assert_eq!(cli.global.project_dir, "project");
    assert_eq!(cli.global.target.as_deref(), Some("local"));
    match cli.command {
        Commands::Run(args) => {
            assert!(args.skip_checks);
            assert_eq!(args.output, OutputFormat::Json);
        }
        other => panic!("expected run, got {other:?}"),
    }
}

#[test]
fn test_parse_plan_defaults() {
    let cli = Cli::try_parse_from(["sf", "plan"]).unwrap();
    match cli.command {
        Commands::Plan(args) => {
            assert_eq!(args.dialect, None);
            assert_eq!(args.phase, PlanPhase::All);
            assert_eq!(args.output, OutputFormat::Text);
        }
        other => panic!("expected plan, got {other:?}"),
    }
}

#[test]
fn test_parse_plan_dialect_and_phase() {
    let cli = Cli::try_parse_from(["sf", "plan", "--dialect", "duckdb", "--phase", "load"]).unwrap();
    match cli.command {
        Commands::Plan(args) => {
            assert_eq!(args.dialect, Some(DialectArg::Duckdb));
            assert_eq!(args.phase, PlanPhase::Load);
        }
        other => panic!("expected plan, got {other:?}"),
    }
}

#[test]
fn test_unknown_subcommand_rejected() {
    assert!(Cli::try_parse_from(["sf", "compile"]).is_err());
}
