//! Effect handlers for the TUI runtime.
//!
//! Handlers are pure async functions that return a `UiEvent`. They perform
//! store I/O and never touch UI state; the runtime spawns them and delivers
//! the result to the inbox.

use std::sync::Arc;

use signet_core::flow::{self, StoreRequest};
use signet_core::session::SessionFlag;
use signet_core::store::UserStore;

use crate::events::UiEvent;

/// Runs a sign-in or sign-up request against the stores.
pub async fn submit(
    users: Arc<dyn UserStore>,
    session: SessionFlag,
    request: StoreRequest,
) -> UiEvent {
    let mode = request.mode();
    let username = request.username().to_string();
    tracing::info!(?mode, %username, "Submitting");

    let result = flow::perform(users.as_ref(), &session, request).await;
    match &result {
        Ok(outcome) => tracing::info!(?mode, %username, ?outcome, "Submission completed"),
        Err(e) => tracing::debug!(?mode, %username, error = %e, "Submission failed"),
    }

    UiEvent::SubmitFinished { result }
}

/// Clears the session flag. Failures are logged and otherwise ignored.
pub async fn clear_session(session: SessionFlag) -> UiEvent {
    match session.clear().await {
        Ok(()) => tracing::info!("Logged out"),
        Err(e) => tracing::warn!(error = %format!("{e:#}"), "Failed to clear session flag"),
    }
    UiEvent::SessionCleared
}
