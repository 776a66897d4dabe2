use super::*;
use clap::CommandFactory;
use clap::Parser;

#[test]
fn cli_debug_assert() {
    Cli::command().debug_assert();
}

#[test]
fn summary_parses_defaults() {
    let cli = Cli::try_parse_from(["regdash", "summary", "--db", "sqlite:///tmp/x.db"])
        .expect("parse should succeed");
    match cli.cmd {
        Command::Summary(args) => {
            assert_eq!(args.window.offset, 0);
            assert_eq!(args.window.day, None);
            assert_eq!(args.format, OutputFormat::Text);
            assert_eq!(args.common.config().database_url, "sqlite:///tmp/x.db");
        }
        _ => panic!("expected Command::Summary"),
    }
}

#[test]
fn summary_day_conflicts_with_bounds() {
    let res = Cli::try_parse_from([
        "regdash",
        "summary",
        "--day",
        "2025-10-24",
        "--start",
        "2025-10-24T00:00:00Z",
        "--end",
        "2025-10-25T00:00:00Z",
    ]);
    assert!(res.is_err());
}

#[test]
fn clouds_flag_is_split() {
    let cli = Cli::try_parse_from(["regdash", "trend", "--clouds", "a, b,,c", "--windows", "3"])
        .expect("parse should succeed");
    match cli.cmd {
        Command::Trend(args) => {
            assert_eq!(args.windows, 3);
            assert_eq!(args.common.config().monitored_clouds, vec!["a", "b", "c"]);
        }
        _ => panic!("expected Command::Trend"),
    }
}

#[test]
fn seed_demo_accepts_seed() {
    let cli = Cli::try_parse_from(["regdash", "seed-demo", "--seed", "42", "--count", "10"])
        .expect("parse should succeed");
    match cli.cmd {
        Command::SeedDemo(args) => {
            assert_eq!(args.seed, Some(42));
            assert_eq!(args.count, 10);
        }
        _ => panic!("expected Command::SeedDemo"),
    }
}
