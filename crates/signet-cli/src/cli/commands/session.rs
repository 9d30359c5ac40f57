//! Non-interactive sign-in, sign-up and session commands.
//!
//! These drive the same controller as the interactive screen, so the
//! messages printed here match the notices shown there.

use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use signet_core::config::Config;
use signet_core::controller::AuthFlowController;
use signet_core::flow::FormMode;
use signet_core::session::{JsonFileStore, SessionFlag};

/// Submits the form once in `mode` and prints the resulting notice.
///
/// # Errors
/// Returns the notice message as an error when the submission is rejected.
pub async fn submit(config: &Config, mode: FormMode, username: &str) -> Result<()> {
    let password = read_password()?;

    let mut controller = AuthFlowController::open(config);
    controller.on_startup().await;

    let notice = controller.submit(mode, username, &password).await;
    if notice.is_error() {
        anyhow::bail!("{}", notice.message);
    }
    println!("{}", notice.message);
    Ok(())
}

/// Clears the session flag. Never fails: a flag that cannot be cleared is
/// reported as a warning.
pub async fn logout(config: &Config) -> Result<()> {
    if let Err(e) = session_flag(config).clear().await {
        eprintln!("Warning: failed to clear session flag: {e:#}");
    }
    println!("Logged out");
    Ok(())
}

pub async fn status(config: &Config) -> Result<()> {
    let active = session_flag(config)
        .is_set()
        .await
        .with_context(|| format!("read session flag from {}", config.session_path().display()))?;
    println!("{}", if active { "Logged in" } else { "Logged out" });
    Ok(())
}

/// The session flag alone; these commands never need the user database.
fn session_flag(config: &Config) -> SessionFlag {
    SessionFlag::new(Arc::new(JsonFileStore::new(config.session_path())))
}

/// Reads one line from stdin without its line terminator.
///
/// Surrounding spaces are kept; a whitespace-only password is still a
/// password.
fn read_password() -> Result<String> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        eprint!("Password: ");
        io::stderr().flush().context("flush prompt")?;
    }

    let mut line = String::new();
    stdin.lock().read_line(&mut line).context("read password from stdin")?;
    Ok(line.trim_end_matches(['\n', '\r']).to_string())
}

