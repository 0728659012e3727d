//! `tracker` - command-line access to work items on a tracker server.

#![allow(clippy::print_stdout, reason = "CLI tool outputs to stdout")]

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod values;

use cli::{Cli, Commands};
use tracker_client::{ClientConfig, HttpSession};
use tracker_core::Session;

/// Config file, then `TRACKER_*` environment, then command-line flags.
fn resolve_config(cli: &Cli) -> Result<ClientConfig> {
    let path = cli.config.clone().or_else(ClientConfig::default_path);
    let mut config = match &path {
        Some(path) => ClientConfig::load_file(path)?,
        None => ClientConfig::default(),
    };
    config = config.with_env_overrides();
    if let Some(url) = &cli.url {
        config.base_url = url.clone();
    }
    if let Some(token) = &cli.token {
        config.token = token.clone();
    }
    debug!(config_file = ?path, base_url = %config.base_url, "Resolved client configuration");
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&cli.log_level).context("invalid log filter")?)
        .with_writer(std::io::stderr)
        .init();

    let config = resolve_config(&cli)?;
    let session: Arc<dyn Session> =
        Arc::new(HttpSession::new(config).context("failed to set up tracker session")?);

    match cli.command {
        Commands::Show { reference } => commands::show(&session, &reference, cli.json),
        Commands::Links { reference, roles, back } => commands::links(&session, &reference, roles, back, cli.json),
        Commands::Set { reference, assignments } => commands::set(&session, &reference, &assignments, cli.json),
        Commands::Status { reference, status } => commands::status(&session, &reference, &status),
        Commands::Actions { reference, perform } => {
            commands::actions(&session, &reference, perform.as_deref(), cli.json)
        },
    }
}
