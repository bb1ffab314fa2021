//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Serve command arguments.
#[derive(Debug, Args)]
pub struct ServeCommand {
    /// Address to bind, overriding `server.host`
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on, overriding `server.port`
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Commands for inspecting stored users.
#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List registered emails
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show one user's profile and journal
    Show {
        /// The user's email
        email: String,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

/// Report command arguments.
#[derive(Debug, Args)]
pub struct ReportCommand {
    /// The user's email
    pub email: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}
