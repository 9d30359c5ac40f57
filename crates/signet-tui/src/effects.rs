//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent I/O and task spawning only (no direct UI mutations).
//!
//! This keeps the reducer pure: it only mutates state and returns effects,
//! never performs I/O or spawns tasks directly.

use signet_core::flow::StoreRequest;

use crate::common::TaskId;

/// Effects returned by the reducer for the runtime to execute.
#[derive(Debug)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    /// Run a validated sign-in or sign-up against the stores.
    Submit { task: TaskId, request: StoreRequest },

    /// Remove the persisted session flag.
    ClearSession { task: TaskId },
}
