//! Application state composition.
//!
//! ```text
//! AppState
//! ├── tui: TuiState
//! │   ├── auth: AuthState     (view state, form fields, focus)
//! │   ├── task_seq: TaskSeq   (async task id generator)
//! │   └── tasks: Tasks        (task lifecycle state)
//! └── overlay: Option<Overlay> (modal notice)
//! ```
//!
//! State is split between `TuiState` and `Option<Overlay>` so overlay
//! handlers can hold `&mut` to the overlay and `&TuiState` at once.

use signet_core::flow::ViewState;

use crate::auth::AuthState;
use crate::common::{TaskSeq, Tasks};
use crate::overlays::Overlay;

/// Combined application state for the TUI.
pub struct AppState {
    pub tui: TuiState,
    pub overlay: Option<Overlay>,
}

impl AppState {
    pub fn new(view: ViewState) -> Self {
        Self {
            tui: TuiState::new(view),
            overlay: None,
        }
    }
}

/// TUI application state (non-overlay).
pub struct TuiState {
    /// Flag indicating the app should quit.
    pub should_quit: bool,
    pub auth: AuthState,
    pub task_seq: TaskSeq,
    pub tasks: Tasks,
    /// Last known terminal size (width, height).
    pub terminal_size: (u16, u16),
    /// Spinner animation frame, advanced each tick.
    pub spinner_frame: usize,
}

impl TuiState {
    pub fn new(view: ViewState) -> Self {
        Self {
            should_quit: false,
            auth: AuthState::new(view),
            task_seq: TaskSeq::default(),
            tasks: Tasks::default(),
            terminal_size: (0, 0),
            spinner_frame: 0,
        }
    }
}
