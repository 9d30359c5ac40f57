//! Runtime execution modes.
//!
//! - `tui`: Full-screen interactive sign-in screen (optional feature)

#[cfg(feature = "tui")]
pub use signet_tui::run_interactive;

#[cfg(not(feature = "tui"))]
pub async fn run_interactive(_config: &signet_core::config::Config) -> anyhow::Result<()> {
    anyhow::bail!("TUI support is disabled in this build (feature \"tui\").");
}
