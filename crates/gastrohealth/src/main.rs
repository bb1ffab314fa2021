//! `gastrohealth` - CLI for the GastroHealth backend
//!
//! Runs the HTTP server and offers read-only views of configuration and the
//! user store.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;

use gastrohealth::cli::{Cli, Command, ConfigCommand, ReportCommand, ServeCommand, UsersCommand};
use gastrohealth::{init_logging, Config, HealthReport, Storage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    let config_path = cli.config.clone();
    let load = || Config::load_from(config_path.clone()).context("loading configuration");

    match cli.command {
        Command::Serve(cmd) => handle_serve(load()?, cmd).await,
        Command::Config(cmd) => handle_config(cli.config, &cmd),
        Command::Users(cmd) => handle_users(&load()?, &cmd),
        Command::Report(cmd) => handle_report(&load()?, &cmd),
    }
}

async fn handle_serve(mut config: Config, cmd: ServeCommand) -> anyhow::Result<()> {
    if let Some(host) = cmd.host {
        config.server.host = host;
    }
    if let Some(port) = cmd.port {
        config.server.port = port;
    }
    config.validate()?;

    gastrohealth::server::serve(&config).await?;
    Ok(())
}

fn handle_validate(file: Option<PathBuf>) {
    let path = file.unwrap_or_else(Config::default_config_path);
    println!("Validating configuration: {}", path.display());
    match Config::load_from(Some(path)) {
        Ok(_) => println!("Configuration is valid."),
        Err(e) => println!("Configuration error: {e}"),
    }
}

fn handle_config(config_path: Option<PathBuf>, cmd: &ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = Config::load_from(config_path).context("loading configuration")?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Server]");
                println!("  Host:               {}", config.server.host);
                println!("  Port:               {}", config.server.port);
                println!("  Body limit (bytes): {}", config.server.body_limit_bytes);
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[AI]");
                println!("  Model:              {}", config.ai.model);
                println!("  Base URL:           {}", config.ai.base_url);
                println!("  Timeout:            {}s", config.ai_timeout().as_secs());
                println!("  Language:           {}", config.ai.language);
                println!(
                    "  API key:            {}",
                    if config.has_api_key() { "set" } else { "not set" }
                );
            }
        }
        ConfigCommand::Path => {
            let path = config_path.unwrap_or_else(Config::default_config_path);
            println!("{}", path.display());
        }
        ConfigCommand::Validate { file } => {
            handle_validate(file.clone().or(config_path));
        }
    }
    Ok(())
}

fn handle_users(config: &Config, cmd: &UsersCommand) -> anyhow::Result<()> {
    let storage = Storage::open(config.database_path())?;

    match cmd {
        UsersCommand::List { json } => {
            let users = storage.users()?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&users)?);
            } else if users.is_empty() {
                println!("No users registered.");
            } else {
                for email in users {
                    println!("{email}");
                }
            }
        }
        UsersCommand::Show { email, json } => {
            let email = email.trim();
            let Some(record) = storage.get_user(email)? else {
                bail!("user not found: {email}");
            };
            if *json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                println!("User:      {email}");
                match &record.user_profile {
                    Some(profile) => {
                        println!("Condition: {}", profile.condition);
                        println!("Pain:      {}/10", profile.pain_level);
                        println!("Triggers:  {}", profile.trigger_foods);
                        println!("Goal:      {}", profile.dietary_goal);
                    }
                    None => println!("Profile:   not completed"),
                }
                println!("Symptoms:  {}", record.symptoms.len());
                for symptom in &record.symptoms {
                    println!(
                        "  {}  pain {:>2}  {}",
                        symptom.timestamp.format("%Y-%m-%d %H:%M"),
                        symptom.pain_level,
                        symptom.eaten_foods
                    );
                }
            }
        }
    }
    Ok(())
}

fn handle_report(config: &Config, cmd: &ReportCommand) -> anyhow::Result<()> {
    let storage = Storage::open(config.database_path())?;
    let email = cmd.email.trim();
    let Some(record) = storage.get_user(email)? else {
        bail!("user not found: {email}");
    };

    let report = HealthReport::from_symptoms(&record.symptoms);
    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Health report for {email}");
        println!("{report}");
    }
    Ok(())
}
