//! Persisted login flag.
//!
//! Stores string values in `<base>/session.json` with restricted
//! permissions (0600). `SessionFlag` wraps any key-value store and reads
//! and writes the single `isLoggedIn` key.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Key the login flag is stored under.
pub const SESSION_FLAG_KEY: &str = "isLoggedIn";

/// Value stored while a session is active.
const LOGGED_IN_VALUE: &str = "true";

/// String key-value persistence.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, if any.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes a value. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}

/// On-disk map layout.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct KeyValueFile {
    #[serde(flatten)]
    entries: BTreeMap<String, String>,
}

/// Key-value store persisted as a JSON object.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within the process.
    lock: Arc<Mutex<()>>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn run<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Path) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let path = self.path.clone();
        let lock = Arc::clone(&self.lock);
        tokio::task::spawn_blocking(move || {
            let _guard = lock.lock();
            f(&path)
        })
        .await
        .map_err(|e| anyhow!("Session store task failed: {e}"))?
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_string();
        self.run(move |path| Ok(load(path)?.entries.get(&key).cloned()))
            .await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let key = key.to_string();
        let value = value.to_string();
        self.run(move |path| {
            let (mut file, _) = load_for_update(path)?;
            file.entries.insert(key, value);
            save(path, &file)
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let key = key.to_string();
        self.run(move |path| {
            let (mut file, reset) = load_for_update(path)?;
            if file.entries.remove(&key).is_some() || reset {
                save(path, &file)?;
            }
            Ok(())
        })
        .await
    }
}

/// Loads the map from disk. A missing file is an empty map.
fn load(path: &Path) -> Result<KeyValueFile> {
    if !path.exists() {
        return Ok(KeyValueFile::default());
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read session store from {}", path.display()))?;
    if contents.trim().is_empty() {
        return Ok(KeyValueFile::default());
    }

    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse session store from {}", path.display()))
}

/// Loads the map before a write.
///
/// An unparseable file is replaced rather than blocking every later write;
/// the returned flag is true when that happened.
fn load_for_update(path: &Path) -> Result<(KeyValueFile, bool)> {
    match load(path) {
        Ok(file) => Ok((file, false)),
        Err(e) if e.downcast_ref::<serde_json::Error>().is_some() => {
            tracing::warn!(
                path = %path.display(),
                error = %format!("{e:#}"),
                "Discarding unreadable session store"
            );
            Ok((KeyValueFile::default(), true))
        }
        Err(e) => Err(e),
    }
}

/// Saves the map to disk with restricted permissions (0600).
///
/// Writes go to a sibling temp file that is renamed over the target, so a
/// crash mid-write leaves the previous contents intact.
fn save(path: &Path, file: &KeyValueFile) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let contents = serde_json::to_string_pretty(file).context("Failed to serialize session")?;
    let tmp_path = path.with_extension("json.tmp");

    #[cfg(unix)]
    {
        use std::fs::OpenOptions;
        use std::io::Write;
        use std::os::unix::fs::OpenOptionsExt;

        let mut out = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(&tmp_path)
            .with_context(|| format!("Failed to open {} for writing", tmp_path.display()))?;
        out.write_all(contents.as_bytes())
            .and_then(|()| out.sync_all())
            .with_context(|| format!("Failed to write to {}", tmp_path.display()))?;
    }

    #[cfg(not(unix))]
    {
        fs::write(&tmp_path, contents)
            .with_context(|| format!("Failed to write to {}", tmp_path.display()))?;
    }

    fs::rename(&tmp_path, path).with_context(|| {
        format!(
            "Failed to rename {} to {}",
            tmp_path.display(),
            path.display()
        )
    })
}

/// The persisted "currently logged in" flag.
#[derive(Clone)]
pub struct SessionFlag {
    store: Arc<dyn KeyValueStore>,
}

impl SessionFlag {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Returns true only when the stored value is exactly `"true"`.
    ///
    /// # Errors
    /// Returns an error if the underlying store cannot be read.
    pub async fn is_set(&self) -> Result<bool> {
        let value = self.store.get(SESSION_FLAG_KEY).await?;
        Ok(value.as_deref() == Some(LOGGED_IN_VALUE))
    }

    /// Persists an active session.
    ///
    /// # Errors
    /// Returns an error if the underlying store cannot be written.
    pub async fn mark_logged_in(&self) -> Result<()> {
        self.store.set(SESSION_FLAG_KEY, LOGGED_IN_VALUE).await
    }

    /// Removes the flag.
    ///
    /// # Errors
    /// Returns an error if the underlying store cannot be written.
    pub async fn clear(&self) -> Result<()> {
        self.store.remove(SESSION_FLAG_KEY).await
    }
}

impl fmt::Debug for SessionFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionFlag")
            .field("key", &SESSION_FLAG_KEY)
            .finish_non_exhaustive()
    }
}
