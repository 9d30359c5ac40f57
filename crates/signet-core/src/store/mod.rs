//! User record storage.
//!
//! `UserStore` is the seam between the auth flow and whatever keeps
//! registered users. The flow only needs three calls: idempotent schema
//! setup, registration, and a credential check.

mod sqlite;

use async_trait::async_trait;
pub use sqlite::SqliteUserStore;

/// Errors surfaced by a user store.
///
/// The display text is shown to the user verbatim.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The username is already registered.
    #[error("{0}")]
    DuplicateUser(String),

    /// Any other storage failure.
    #[error("{0:#}")]
    Backend(#[from] anyhow::Error),
}

impl StoreError {
    /// Builds the duplicate-username error with its standard message.
    pub fn duplicate(username: &str) -> Self {
        StoreError::DuplicateUser(format!("Username '{username}' already exists"))
    }
}

/// Registration and credential verification.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Creates the backing schema if absent. Safe to call on every launch.
    async fn initialize(&self) -> Result<(), StoreError>;

    /// Registers a new user.
    async fn register(&self, username: &str, password: &str) -> Result<(), StoreError>;

    /// Returns whether the username exists and the password matches.
    async fn authenticate(&self, username: &str, password: &str) -> Result<bool, StoreError>;
}
