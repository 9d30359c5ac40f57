//! Full-screen TUI for Signet.

pub mod common;
pub mod effects;
pub mod events;
pub mod features;
pub mod overlays;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, stderr};

use anyhow::Result;
pub use features::{auth, input};
pub use runtime::TuiRuntime;
use signet_core::config::Config;
use signet_core::controller::AuthFlowController;

/// Runs the interactive sign-in screen.
///
/// Store setup and the session flag are resolved before the terminal is
/// taken over, so the first frame already shows the right view.
///
/// # Errors
/// Returns an error if no terminal is attached or terminal I/O fails. Store
/// failures are logged and surface as notices instead.
pub async fn run_interactive(config: &Config) -> Result<()> {
    if !stderr().is_terminal() {
        anyhow::bail!(
            "The interactive screen requires a terminal.\n\
             Use `signet login` or `signet register` for non-interactive use."
        );
    }

    let mut controller = AuthFlowController::open(config);
    let view = controller.on_startup().await;
    tracing::info!(
        database = %config.database_path().display(),
        session = %config.session_path().display(),
        ?view,
        "Starting interactive screen"
    );

    let (users, session, state) = controller.into_parts();
    let mut runtime = TuiRuntime::new(users, session, state)?;
    runtime.run()
}
