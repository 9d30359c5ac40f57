//! Async driver for the auth flow.
//!
//! `AuthFlowController` owns a [`ViewState`] and the two stores, and runs
//! each operation to completion before returning. The command-line surface
//! uses it directly; the terminal UI drives the same [`flow`](crate::flow)
//! transitions through its own event loop.

use std::sync::Arc;

use crate::config::Config;
use crate::flow::{self, FormMode, Notice, View, ViewState};
use crate::session::{JsonFileStore, SessionFlag};
use crate::store::{SqliteUserStore, UserStore};

/// Shown when a submission arrives on the logged-in view.
pub const ALREADY_LOGGED_IN: &str = "Already logged in. Log out first.";

pub struct AuthFlowController {
    users: Arc<dyn UserStore>,
    session: SessionFlag,
    state: ViewState,
}

impl AuthFlowController {
    pub fn new(users: Arc<dyn UserStore>, session: SessionFlag) -> Self {
        Self {
            users,
            session,
            state: ViewState::default(),
        }
    }

    /// Binds the SQLite user store and the JSON session file named by the
    /// config. Neither is touched until [`on_startup`](Self::on_startup).
    pub fn open(config: &Config) -> Self {
        let users = SqliteUserStore::new(config.database_path());
        let session = SessionFlag::new(Arc::new(JsonFileStore::new(config.session_path())));
        Self::new(Arc::new(users), session)
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn view(&self) -> View {
        self.state.view()
    }

    pub fn session(&self) -> &SessionFlag {
        &self.session
    }

    /// Splits the controller so another event loop can drive the state.
    pub fn into_parts(self) -> (Arc<dyn UserStore>, SessionFlag, ViewState) {
        (self.users, self.session, self.state)
    }

    /// Prepares the user store and restores the logged-in flag.
    ///
    /// Failures are logged and otherwise ignored; an unreadable flag starts
    /// on the sign-in form.
    pub async fn on_startup(&mut self) -> View {
        if let Err(e) = self.users.initialize().await {
            tracing::warn!(error = %e, "User store initialization failed");
        }

        let active = match self.session.is_set().await {
            Ok(active) => active,
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "Failed to read session flag");
                false
            }
        };

        self.state = ViewState::restored(active);
        tracing::info!(logged_in = active, "Auth flow started");
        self.state.view()
    }

    /// Submits the form in the given mode and returns the notice to show.
    ///
    /// Only the form accepts submissions; while logged in the state is left
    /// alone and an error notice is returned.
    pub async fn submit(&mut self, mode: FormMode, username: &str, password: &str) -> Notice {
        if self.state.logged_in {
            tracing::debug!(?mode, username, "Submission while logged in ignored");
            return Notice::error(ALREADY_LOGGED_IN);
        }

        self.state.mode = mode;
        self.state.username = username.to_string();
        self.state.password = password.to_string();

        let result = match self.state.begin_submit() {
            Ok(request) => {
                flow::perform(self.users.as_ref(), &self.session, request).await
            }
            Err(e) => Err(e),
        };

        match &result {
            Ok(outcome) => tracing::info!(?mode, username, ?outcome, "Submission completed"),
            Err(e) => tracing::debug!(?mode, username, error = %e, "Submission failed"),
        }

        self.state.complete(result)
    }

    /// Ends the session. Always lands on the sign-in form.
    pub async fn logout(&mut self) {
        if let Err(e) = self.session.clear().await {
            tracing::warn!(error = %format!("{e:#}"), "Failed to clear session flag");
        }
        self.state.logout();
        tracing::info!("Logged out");
    }

    pub fn toggle_mode(&mut self) {
        self.state.toggle_mode();
    }
}
