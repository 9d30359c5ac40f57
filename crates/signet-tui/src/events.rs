//! UI event types.
//!
//! Everything the reducer reacts to arrives as a `UiEvent`: terminal input,
//! frame housekeeping, and results of async tasks delivered via the inbox.

use crossterm::event::Event;
use signet_core::flow::{AuthError, SubmitOutcome};

use crate::common::{TaskCompleted, TaskKind, TaskStarted};

#[derive(Debug)]
pub enum UiEvent {
    /// Render cadence tick.
    Tick,
    /// Current terminal size, sent before other events each loop.
    Frame { width: u16, height: u16 },
    /// Raw terminal input.
    Terminal(Event),

    TaskStarted {
        kind: TaskKind,
        started: TaskStarted,
    },
    TaskCompleted {
        kind: TaskKind,
        completed: TaskCompleted<Box<UiEvent>>,
    },

    /// A store request finished.
    SubmitFinished {
        result: Result<SubmitOutcome, AuthError>,
    },
    /// The session flag removal finished (failures are already logged).
    SessionCleared,
}
