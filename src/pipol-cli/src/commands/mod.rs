pub mod user;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use pipol_sdk::{PipolClient, SessionStore};
use tracing::warn;

use crate::config::PipolConfig;

/// PIPOL CLI, manage the login session and the user directory
#[derive(Parser)]
#[command(name = "pipol", version, about)]
pub struct Cli {
    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Backend base URL, overrides the configuration file
    #[arg(long, env = "PIPOL_URL")]
    url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable quiet mode (minimal output)
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and persist the session token
    Login {
        /// Account email
        email: String,
        /// Account password
        password: String,
    },
    /// Register a new account
    Register {
        /// Full name
        fullname: String,
        /// Account email
        email: String,
        /// Account password
        password: String,
        /// Re-typed password, checked locally before anything is sent
        #[arg(long)]
        confirm_password: Option<String>,
    },
    /// Drop the persisted session
    Logout,
    /// Show the account record of the current session
    Whoami,
    /// Manage user records
    User {
        #[command(subcommand)]
        action: user::UserAction,
    },
    /// Show the effective configuration and exit
    Config {
        /// Show configuration in JSON format
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        init_logging(self.quiet, self.verbose);

        let mut config = match &self.config {
            Some(path) => PipolConfig::load_from_path(path),
            None => PipolConfig::load(),
        }
        .context("Failed to load configuration")?;
        if let Some(url) = self.url {
            config.server.url = url;
        }

        let session = SessionStore::new(config.session.path.clone());
        let client = PipolClient::new(&config.server.url, session);

        match self.command {
            Commands::Login { email, password } => {
                let auth = client.login(&email, &password).await?;
                match auth.fullname {
                    Some(fullname) => println!("Logged in as {fullname}."),
                    None => println!("Logged in."),
                }
            }
            Commands::Register {
                fullname,
                email,
                password,
                confirm_password,
            } => {
                if let Some(confirm) = confirm_password {
                    if confirm != password {
                        anyhow::bail!("Passwords do not match");
                    }
                }
                let resp = client.register(&fullname, &email, &password).await?;
                match resp.message {
                    Some(message) => println!("{message}"),
                    None => println!("Registration successful."),
                }
                println!("Please login with your new credentials.");
            }
            Commands::Logout => {
                // A broken session store should not keep anyone logged in
                if let Err(e) = client.logout().await {
                    warn!("failed to clear session: {e}");
                }
                println!("Logged out.");
            }
            Commands::Whoami => {
                let me = client.me().await?;
                println!("{}", serde_json::to_string_pretty(&me)?);
            }
            Commands::User { action } => action.run(&client).await?,
            Commands::Config { json } => display_config(&config, client.session(), json).await?,
        }
        Ok(())
    }
}

fn init_logging(quiet: bool, verbose: bool) {
    let level = if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    // Logs go to stderr so stdout stays clean for command output
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .init();
}

/// Display configuration in human-readable or JSON format
async fn display_config(
    config: &PipolConfig,
    session: &SessionStore,
    json: bool,
) -> anyhow::Result<()> {
    if json {
        let json = serde_json::to_string_pretty(config)
            .context("Failed to serialize configuration to JSON")?;
        println!("{json}");
    } else {
        println!("PIPOL Configuration:");
        println!("====================");
        println!("Server URL: {}", config.server.url);
        println!("Session file: {}", config.session.path.display());
        let token = match session.load().await {
            Ok(Some(_)) => "present",
            Ok(None) => "absent",
            Err(_) => "unreadable",
        };
        println!("Session token: {token}");
    }
    Ok(())
}
