//! File logging setup.
//!
//! The interactive screen owns the terminal, so log output goes to
//! `<SIGNET_HOME>/logs/<log_file>` through a non-blocking appender.
//! `SIGNET_LOG` takes precedence over the configured level.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

use crate::config::{Config, paths};

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV: &str = "SIGNET_LOG";

/// Installs the global subscriber.
///
/// The returned guard flushes buffered lines on drop and must be held for
/// the lifetime of the program.
///
/// # Errors
/// Returns an error if the log directory or file cannot be created, or a
/// subscriber is already installed.
pub fn init(config: &Config) -> Result<WorkerGuard> {
    let dir = paths::logs_dir();
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let appender = file_appender(&dir, &config.log_file)?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter_for(config))
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {e}"))?;

    Ok(guard)
}

/// Opens `<dir>/<file>` for appending, without rotation.
fn file_appender(dir: &Path, file: &str) -> Result<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file)
        .build(dir)
        .with_context(|| format!("Failed to open log file {}", dir.join(file).display()))
}

fn filter_for(config: &Config) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_appender_writes_to_named_file() {
        let dir = tempdir().unwrap();

        let mut appender = file_appender(dir.path(), "signet.log").unwrap();
        appender.write_all(b"hello\n").unwrap();
        appender.flush().unwrap();

        let contents = fs::read_to_string(dir.path().join("signet.log")).unwrap();
        assert_eq!(contents, "hello\n");
    }

    #[test]
    fn test_unwritable_log_file_is_an_error() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("signet.log")).unwrap();

        let err = file_appender(dir.path(), "signet.log").unwrap_err();

        assert!(format!("{err:#}").contains("Failed to open log file"));
    }
}
