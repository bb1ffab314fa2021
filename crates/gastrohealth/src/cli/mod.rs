//! Command-line interface for gastrohealth.
//!
//! This module provides the CLI structure for the `gastrohealth` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{ConfigCommand, ReportCommand, ServeCommand, UsersCommand};

/// gastrohealth - Symptom journal and diet assistant backend
///
/// Serves the HTTP API used by the GastroHealth client and inspects the
/// flat-file user store.
#[derive(Debug, Parser)]
#[command(name = "gastrohealth")]
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
    /// Run the HTTP server
    Serve(ServeCommand),

    /// View configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Inspect stored users
    #[command(subcommand)]
    Users(UsersCommand),

    /// Print a user's health report
    Report(ReportCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::Verbosity;
    use clap::CommandFactory;

    fn cli(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            verbose,
            quiet,
            command: Command::Serve(ServeCommand {
                host: None,
                port: None,
            }),
        }
    }

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "gastrohealth");
    }

    #[test]
    fn test_verbosity_flags() {
        assert_eq!(cli(0, true).verbosity(), Verbosity::Quiet);
        assert_eq!(cli(3, true).verbosity(), Verbosity::Quiet);
        assert_eq!(cli(0, false).verbosity(), Verbosity::Normal);
        assert_eq!(cli(1, false).verbosity(), Verbosity::Verbose);
        assert_eq!(cli(2, false).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve_with_port() {
        let cli = Cli::try_parse_from(["gastrohealth", "serve", "--port", "8080"]).unwrap();
        match cli.command {
            Command::Serve(cmd) => {
                assert_eq!(cmd.port, Some(8080));
                assert!(cmd.host.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_users_show() {
        let cli = Cli::try_parse_from(["gastrohealth", "users", "show", "a@example.com", "--json"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Command::Users(UsersCommand::Show { json: true, .. })
        ));
    }

    #[test]
    fn test_parse_report() {
        let cli = Cli::try_parse_from(["gastrohealth", "report", "a@example.com"]).unwrap();
        match cli.command {
            Command::Report(cmd) => assert_eq!(cmd.email, "a@example.com"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_config_validate() {
        let cli = Cli::try_parse_from(["gastrohealth", "config", "validate", "-f", "/tmp/c.toml"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Validate { file: Some(_) })
        ));
    }

    #[test]
    fn test_parse_with_config() {
        let args = ["gastrohealth", "-c", "/custom/config.toml", "users", "list"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_with_verbose_and_quiet() {
        let cli = Cli::try_parse_from(["gastrohealth", "-vv", "serve"]).unwrap();
        assert_eq!(cli.verbose, 2);

        let cli = Cli::try_parse_from(["gastrohealth", "-q", "serve"]).unwrap();
        assert!(cli.quiet);
    }

    #[test]
    fn test_command_is_required() {
        assert!(Cli::try_parse_from(["gastrohealth"]).is_err());
    }
}
