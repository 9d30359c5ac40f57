//! SQLite-backed user store.
//!
//! Tables:
//! - `users`: username, password_hash, salt, created_at

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, anyhow};
use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::{Connection, ErrorCode, OptionalExtension, params};
use sha2::{Digest, Sha256};

use super::{StoreError, UserStore};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    salt TEXT NOT NULL,
    created_at INTEGER NOT NULL
);";

/// Salt used for the dummy hash when a username is unknown.
const DUMMY_SALT: &str = "00000000000000000000000000000000";

/// Digest compared against when a username is unknown.
const DUMMY_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// User store persisted in a local SQLite database.
///
/// The file is opened on first use, so a store that cannot be opened
/// still constructs and reports the failure from each call.
pub struct SqliteUserStore {
    path: PathBuf,
    conn: Arc<Mutex<Option<Connection>>>,
}

impl SqliteUserStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            conn: Arc::new(Mutex::new(None)),
        }
    }

    /// Runs a blocking closure against the connection off the async runtime,
    /// opening it first if needed.
    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            let mut slot = conn.lock();
            let conn = match slot.take() {
                Some(conn) => slot.insert(conn),
                None => slot.insert(connect(&path)?),
            };
            f(conn)
        })
        .await
        .map_err(|e| StoreError::Backend(anyhow!("User store task failed: {e}")))?
    }
}

/// Opens (or creates) the database file, creating parent directories.
fn connect(path: &Path) -> anyhow::Result<Connection> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let conn = Connection::open(path)
        .with_context(|| format!("Failed to open user database {}", path.display()))?;

    // WAL mode for crash safety
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;",
    )
    .with_context(|| format!("Failed to configure user database {}", path.display()))?;

    Ok(conn)
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn initialize(&self) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            conn.execute_batch(SCHEMA)
                .context("Failed to create users table")?;
            Ok(())
        })
        .await
    }

    async fn register(&self, username: &str, password: &str) -> Result<(), StoreError> {
        let username = username.to_string();
        let password = password.to_string();

        self.with_conn(move |conn| {
            let salt = uuid::Uuid::new_v4().simple().to_string();
            let password_hash = hash_password(&password, &salt);
            let now = chrono::Utc::now().timestamp();

            let result = conn.execute(
                "INSERT INTO users (username, password_hash, salt, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![username, password_hash, salt, now],
            );

            match result {
                Ok(_) => Ok(()),
                Err(rusqlite::Error::SqliteFailure(err, _))
                    if err.code == ErrorCode::ConstraintViolation =>
                {
                    Err(StoreError::duplicate(&username))
                }
                Err(e) => Err(StoreError::Backend(
                    anyhow::Error::new(e).context("Failed to register user"),
                )),
            }
        })
        .await
    }

    async fn authenticate(&self, username: &str, password: &str) -> Result<bool, StoreError> {
        let username = username.to_string();
        let password = password.to_string();

        self.with_conn(move |conn| {
            let row: Option<(String, String)> = conn
                .query_row(
                    "SELECT password_hash, salt FROM users WHERE username = ?1",
                    params![username],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()
                .context("Failed to look up user")?;

            match row {
                Some((stored_hash, salt)) => {
                    let attempt = hash_password(&password, &salt);
                    Ok(constant_time_eq(stored_hash.as_bytes(), attempt.as_bytes()))
                }
                None => {
                    // Keep timing comparable to the known-user path
                    let attempt = hash_password(&password, DUMMY_SALT);
                    std::hint::black_box(constant_time_eq(
                        DUMMY_HASH.as_bytes(),
                        attempt.as_bytes(),
                    ));
                    Ok(false)
                }
            }
        })
        .await
    }
}

fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
