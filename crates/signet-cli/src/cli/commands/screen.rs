//! Interactive screen command handler.

use anyhow::{Context, Result};
use signet_core::config::Config;

use crate::modes;

pub async fn run(config: &Config) -> Result<()> {
    modes::run_interactive(config)
        .await
        .context("interactive screen failed")
}
