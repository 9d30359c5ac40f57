//! Configuration management for Signet.
//!
//! Loads configuration from ${SIGNET_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Returns the default config template with comments.
///
/// This is embedded from default_config.toml at compile time.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for Signet configuration and data directories.
    //!
    //! SIGNET_HOME resolution order:
    //! 1. SIGNET_HOME environment variable (if set)
    //! 2. ~/.config/signet (default)

    use std::path::PathBuf;

    /// Environment variable that overrides the home directory.
    pub const HOME_ENV: &str = "SIGNET_HOME";

    /// Returns the Signet home directory.
    ///
    /// Checks SIGNET_HOME env var first, falls back to ~/.config/signet.
    /// When no home directory can be determined, the current directory is used.
    pub fn signet_home() -> PathBuf {
        if let Ok(home) = std::env::var(HOME_ENV) {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".signet"),
            |h| h.join(".config").join("signet"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        signet_home().join("config.toml")
    }

    /// Returns the directory log files are written to.
    pub fn logs_dir() -> PathBuf {
        signet_home().join("logs")
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite database holding registered users (relative to SIGNET_HOME)
    pub database_file: String,

    /// JSON key-value file holding the session flag (relative to SIGNET_HOME)
    pub session_file: String,

    /// Default log filter; `SIGNET_LOG` overrides it
    pub log_level: String,

    /// Log file name inside `<SIGNET_HOME>/logs`
    pub log_file: String,
}

impl Config {
    const DEFAULT_DATABASE_FILE: &str = "signet.db";
    const DEFAULT_SESSION_FILE: &str = "session.json";
    const DEFAULT_LOG_LEVEL: &str = "info";
    const DEFAULT_LOG_FILE: &str = "signet.log";

    /// Loads configuration from the default config path.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Resolves the user database path against the home directory.
    pub fn database_path(&self) -> PathBuf {
        resolve(&self.database_file)
    }

    /// Resolves the session flag file path against the home directory.
    pub fn session_path(&self) -> PathBuf {
        resolve(&self.session_file)
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    ///
    /// # Errors
    /// Returns an error if the file exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_file: Self::DEFAULT_DATABASE_FILE.to_string(),
            session_file: Self::DEFAULT_SESSION_FILE.to_string(),
            log_level: Self::DEFAULT_LOG_LEVEL.to_string(),
            log_file: Self::DEFAULT_LOG_FILE.to_string(),
        }
    }
}

/// Absolute paths are kept, relative ones live under SIGNET_HOME.
fn resolve(file: &str) -> PathBuf {
    let path = Path::new(file);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        paths::signet_home().join(path)
    }
}
