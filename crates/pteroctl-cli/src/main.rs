//! pteroctl - administer Pterodactyl panel users from the terminal.

mod commands;
mod config;
mod credentials;
mod output;

use std::io;

use anyhow::{Context, Result};
use pteroctl_core::PanelClient;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{Command, Invocation, USAGE};
use config::Settings;
use credentials::CredentialStore;

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();
    init_tracing();

    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Invocation { command, json } = Invocation::parse(&args)?;

    match command {
        Command::Help => {
            println!("{}", USAGE);
            Ok(())
        }
        Command::Login { panel_url } => login(panel_url).await,
        Command::Logout => logout(),
        command => {
            let settings = Settings::load()?;
            let client = PanelClient::from_config(settings.client_config()?)?;
            commands::run_users(&client, command, json).await
        }
    }
}

/// Prompt for a token, check it against the panel, then remember it.
async fn login(panel_url: String) -> Result<()> {
    let token = rpassword::prompt_password("Application API token: ")
        .context("Failed to read API token")?;

    let client = PanelClient::new(panel_url.clone(), token.trim())?;
    let users = client
        .list_users()
        .await
        .context("Token was not accepted by the panel")?;
    info!(panel = %panel_url, users = users.len(), "Token verified");

    CredentialStore::store_token(&panel_url, token.trim())?;
    Settings {
        panel_url: Some(panel_url.clone()),
    }
    .save()?;

    println!("Logged in to {}", panel_url);
    Ok(())
}

fn logout() -> Result<()> {
    let settings = Settings::load()?;
    let panel_url = settings
        .panel_url
        .context("Not logged in to any panel")?;
    CredentialStore::delete_token(&panel_url)?;
    println!("Removed stored token for {}", panel_url);
    Ok(())
}
