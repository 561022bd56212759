use super::*;
use clap::CommandFactory;
use clap::Parser;
use std::path::PathBuf;

#[test]
fn cli_debug_assert() {
    Cli::command().debug_assert();
}

#[test]
fn extract_parses_positional_dirs_and_filters() {
    let cli = Cli::try_parse_from([
        "skillbench",
        "extract",
        "jobs/kimi-mining-xp-10m",
        "jobs/opus-mining-xp-10m",
        "--filter",
        "mining",
        "--horizon",
        "10m",
        "--per-model",
    ])
    .expect("parse should succeed");

    match cli.cmd {
        Command::Extract(args) => {
            assert_eq!(
                args.dirs,
                vec![
                    PathBuf::from("jobs/kimi-mining-xp-10m"),
                    PathBuf::from("jobs/opus-mining-xp-10m")
                ]
            );
            assert_eq!(args.filter.as_deref(), Some("mining"));
            assert_eq!(args.horizon.as_deref(), Some("10m"));
            assert!(args.per_model);
            assert!(!args.no_transcripts);
        }
        _ => panic!("expected Command::Extract"),
    }
}

#[test]
fn extract_defaults_leave_overrides_unset() {
    let cli = Cli::try_parse_from(["skillbench", "extract", "--out", "site/data"])
        .expect("parse should succeed");

    match cli.cmd {
        Command::Extract(args) => {
            assert!(args.dirs.is_empty());
            assert_eq!(args.out_dir, Some(PathBuf::from("site/data")));
            assert!(args.script_var.is_none());
            assert!(args.config.config.is_none());
        }
        _ => panic!("expected Command::Extract"),
    }
}

#[test]
fn inspect_accepts_json_format() {
    let cli = Cli::try_parse_from(["skillbench", "inspect", "t1", "--format", "json"])
        .expect("parse should succeed");

    match cli.cmd {
        Command::Inspect(args) => {
            assert_eq!(args.trial_dir, PathBuf::from("t1"));
            assert_eq!(args.format, OutputFormat::Json);
        }
        _ => panic!("expected Command::Inspect"),
    }
}

#[test]
fn inspect_requires_trial_dir() {
    assert!(Cli::try_parse_from(["skillbench", "inspect"]).is_err());
}
