//! Auth feature slice: the sign-in / sign-up form and the logged-in view.
//!
//! - `state.rs`: `AuthState` (view state, text fields, focus)
//! - `update.rs`: key handling and submit/logout transitions
//! - `render.rs`: card rendering

mod render;
mod state;
mod update;

pub use render::{CARD_WIDTH, card_height, render_auth, welcome_message};
pub use state::{AuthState, Focus};
pub use update::{handle_main_key, handle_paste, handle_submit_result};
