use clap::Parser;
use stamp::cli::{Args, Command, Toggle};
use std::ffi::OsString;
use std::path::PathBuf;

fn make_args(args: &[&str]) -> Vec<OsString> {
    let mut res = vec![OsString::from("stamp")];
    res.extend(args.iter().map(OsString::from));
    res
}

#[test]
fn test_start() {
    let parsed = Args::try_parse_from(make_args(&["start", "greeter"])).unwrap();

    assert!(!parsed.verbose);
    assert!(parsed.session_file.is_none());
    match parsed.command {
        Command::Start { name } => assert_eq!(name, "greeter"),
        other => panic!("Expected Start, got {other:?}"),
    }
}

#[test]
fn test_add_flags() {
    let parsed = Args::try_parse_from(make_args(&["add", "-r", "src", "README.md"])).unwrap();

    match parsed.command {
        Command::Add { recursive, paths } => {
            assert!(recursive);
            assert_eq!(paths, vec![PathBuf::from("src"), PathBuf::from("README.md")]);
        }
        other => panic!("Expected Add, got {other:?}"),
    }
}

#[test]
fn test_global_flags_after_subcommand() {
    let parsed = Args::try_parse_from(make_args(&[
        "generate",
        "--force",
        "--verbose",
        "--session-file",
        "gen.json",
    ]))
    .unwrap();

    assert!(parsed.verbose);
    assert_eq!(parsed.session_file.as_deref(), Some("gen.json"));
    assert!(matches!(parsed.command, Command::Generate { force: true }));
}

#[test]
fn test_parent_dir_toggle() {
    let parsed = Args::try_parse_from(make_args(&["parent-dir", "on"])).unwrap();
    match parsed.command {
        Command::ParentDir { state } => {
            assert_eq!(state, Toggle::On);
            assert!(bool::from(state));
        }
        other => panic!("Expected ParentDir, got {other:?}"),
    }
    assert!(Args::try_parse_from(make_args(&["parent-dir", "maybe"])).is_err());
}

#[test]
fn test_use_name_and_show() {
    let parsed = Args::try_parse_from(make_args(&["use-name", "greeter"])).unwrap();
    assert!(matches!(parsed.command, Command::UseName { word } if word == "greeter"));

    let parsed = Args::try_parse_from(make_args(&["show"])).unwrap();
    assert!(matches!(parsed.command, Command::Show { paths } if paths.is_empty()));
}

#[test]
fn test_missing_args() {
    assert!(Args::try_parse_from(make_args(&[])).is_err());
    assert!(Args::try_parse_from(make_args(&["add"])).is_err());
    assert!(Args::try_parse_from(make_args(&["start"])).is_err());
}

#[test]
fn test_too_many_args() {
    assert!(Args::try_parse_from(make_args(&["start", "greeter", "extra"])).is_err());
}
