//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use signet_core::config;
use signet_core::flow::FormMode;
use signet_core::logging;

mod commands;

#[derive(Parser)]
#[command(name = "signet")]
#[command(version = "0.1")]
#[command(about = "Sign in or sign up against a local user store")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Sign in; the password is read from the first line of stdin
    Login {
        /// Account name
        #[arg(short, long)]
        username: String,
    },
    /// Create an account; the password is read from the first line of stdin
    Register {
        /// Account name
        #[arg(short, long)]
        username: String,
    },
    /// End the persisted session
    Logout,
    /// Show whether a session is persisted
    Status,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    // Config commands must work even when the file is missing or broken.
    match cli.command {
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        },
        command => dispatch_with_config(command).await,
    }
}

async fn dispatch_with_config(command: Option<Commands>) -> Result<()> {
    let config = config::Config::load().context("load config")?;

    let _log_guard = match logging::init(&config) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {e:#}");
            None
        }
    };

    // default to the interactive screen
    let Some(command) = command else {
        return commands::screen::run(&config).await;
    };

    match command {
        Commands::Login { username } => {
            commands::session::submit(&config, FormMode::SignIn, &username).await
        }
        Commands::Register { username } => {
            commands::session::submit(&config, FormMode::SignUp, &username).await
        }
        Commands::Logout => commands::session::logout(&config).await,
        Commands::Status => commands::session::status(&config).await,
        // handled by `dispatch`
        Commands::Config { .. } => Ok(()),
    }
}
