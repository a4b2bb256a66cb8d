//! Command-line interface for lifeline.
//!
//! This module provides the CLI structure for the `lifeline` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{ConfigCommand, PageArg, RunCommand, StatusCommand};

/// lifeline - Headless operations console for a medical drone fleet
///
/// Logs in against the fleet backend (or the offline demo accounts), drives
/// the console pages with their periodic refreshes and prints what they
/// render.
#[derive(Debug, Parser)]
#[command(name = "lifeline")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in, open pages and print the rendered console
    Run(RunCommand),

    /// Fetch KPIs and fleet status once
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.quiet, self.verbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn status_cli(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            verbose,
            quiet,
            command: Command::Status(StatusCommand {
                json: false,
                offline: false,
            }),
        }
    }

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "lifeline");
    }

    #[test]
    fn test_verbosity() {
        use crate::logging::Verbosity;

        assert_eq!(status_cli(0, true).verbosity(), Verbosity::Quiet);
        assert_eq!(status_cli(0, false).verbosity(), Verbosity::Normal);
        assert_eq!(status_cli(1, false).verbosity(), Verbosity::Verbose);
        assert_eq!(status_cli(2, false).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_defaults() {
        let args = vec!["lifeline", "run", "-u", "demo", "-p", "demo123"];
        let cli = Cli::try_parse_from(args).unwrap();
        let Command::Run(run) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(run.username, "demo");
        assert_eq!(run.pages, vec![PageArg::Dashboard]);
        assert_eq!(run.duration_secs, 10);
        assert!(!run.offline);
        assert!(!run.emergency);
    }

    #[test]
    fn test_parse_run_pages() {
        let args = vec![
            "lifeline", "run", "-u", "demo", "-p", "demo123", "--page", "fleet", "--page",
            "tracking", "--offline", "--emergency",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        let Command::Run(run) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(run.pages, vec![PageArg::Fleet, PageArg::Tracking]);
        assert!(run.offline);
        assert!(run.emergency);
    }

    #[test]
    fn test_parse_run_requires_credentials() {
        let args = vec!["lifeline", "run", "-u", "demo"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_parse_status() {
        let args = vec!["lifeline", "status", "--json"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(cli.command, Command::Status(StatusCommand { json: true, .. })));
    }

    #[test]
    fn test_parse_config_validate() {
        let args = vec!["lifeline", "config", "validate", "--file", "/tmp/lifeline.toml"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Validate { file: Some(_) })
        ));
    }

    #[test]
    fn test_parse_with_config() {
        let args = vec!["lifeline", "-c", "/custom/config.toml", "status"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_with_verbose_and_quiet() {
        let cli = Cli::try_parse_from(vec!["lifeline", "-vv", "status"]).unwrap();
        assert_eq!(cli.verbose, 2);

        let cli = Cli::try_parse_from(vec!["lifeline", "-q", "status"]).unwrap();
        assert!(cli.quiet);
    }
}
