//! Tests for page, children, config and completions.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;
use clap_complete::Shell;
use std::path::PathBuf;

#[test]
fn cli_parse_page() {
    match parse(&["confmirror", "page", "12345"]) {
        CliCommand::Page { id, output } => {
            assert_eq!(id, "12345");
            assert!(output.is_none());
        }
        _ => panic!("expected Page"),
    }
}

#[test]
fn cli_parse_page_with_output() {
    match parse(&["confmirror", "page", "7", "--output", "/tmp/one"]) {
        CliCommand::Page { id, output } => {
            assert_eq!(id, "7");
            assert_eq!(output, Some(PathBuf::from("/tmp/one")));
        }
        _ => panic!("expected Page with --output"),
    }
}

#[test]
fn cli_parse_page_requires_id() {
    assert!(Cli::try_parse_from(["confmirror", "page"]).is_err());
}

#[test]
fn cli_parse_children() {
    match parse(&["confmirror", "children", "55"]) {
        CliCommand::Children { id } => assert_eq!(id, "55"),
        _ => panic!("expected Children"),
    }
}

#[test]
fn cli_parse_config() {
    match parse(&["confmirror", "config"]) {
        CliCommand::Config => {}
        _ => panic!("expected Config"),
    }
}

#[test]
fn cli_parse_completions() {
    match parse(&["confmirror", "completions", "bash"]) {
        CliCommand::Completions { shell } => assert_eq!(shell, Shell::Bash),
        _ => panic!("expected Completions"),
    }
}

#[test]
fn cli_definition_is_consistent() {
    use clap::CommandFactory;
    Cli::command().debug_assert();
}
