use std::path::PathBuf;

use clap::Parser;
use tempguard::cli::{Cli, Commands};

#[test]
fn test_parse_evaluate() {
    let cli = Cli::try_parse_from([
        "tempguard",
        "evaluate",
        "--record",
        "record.json",
        "--task",
        "task.json",
        "--log-file",
        "log.json",
    ])
    .unwrap();

    assert!(!cli.json);
    match cli.command {
        Commands::Evaluate(args) => {
            assert_eq!(args.record, PathBuf::from("record.json"));
            assert_eq!(args.task, PathBuf::from("task.json"));
            assert_eq!(args.log_file, Some(PathBuf::from("log.json")));
            assert!(args.directory.is_none());
            assert!(args.context.is_none());
        }
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "tempguard",
        "follow-up",
        "-r",
        "r.json",
        "-t",
        "t.json",
        "-c",
        "ctx.json",
        "--json",
        "--config",
        "custom.yaml",
    ])
    .unwrap();

    assert!(cli.json);
    assert_eq!(cli.config, Some(PathBuf::from("custom.yaml")));
    match cli.command {
        Commands::FollowUp(args) => assert_eq!(args.context, PathBuf::from("ctx.json")),
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_follow_up_requires_context() {
    assert!(Cli::try_parse_from(["tempguard", "follow-up", "-r", "r.json", "-t", "t.json"]).is_err());
}

#[test]
fn test_parse_config() {
    let cli = Cli::try_parse_from(["tempguard", "config"]).unwrap();
    assert!(matches!(cli.command, Commands::Config(_)));
}

#[test]
fn test_unknown_command_rejected() {
    assert!(Cli::try_parse_from(["tempguard", "submit"]).is_err());
}
