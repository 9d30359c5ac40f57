//! Pure view/render functions for the TUI.
//!
//! This module contains all rendering logic. Functions here:
//! - Take `&AppState` by immutable reference
//! - Draw to a ratatui Frame
//! - Never mutate state or return effects

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Color;
use signet_core::flow::View;

use crate::auth;
use crate::overlays::OverlayExt;
use crate::overlays::render_utils::{InputHint, calculate_overlay_area, render_hints};
use crate::state::AppState;

/// Height of the key hint line at the bottom of the screen.
const HINTS_HEIGHT: u16 = 1;

/// Renders the entire TUI to the frame.
///
/// This is a pure render function - it only reads state and draws to frame.
/// No mutations, no side effects.
pub fn render(app: &AppState, frame: &mut Frame) {
    let area = frame.area();
    let state = &app.tui;

    let body = Rect::new(
        area.x,
        area.y,
        area.width,
        area.height.saturating_sub(HINTS_HEIGHT),
    );
    let card = calculate_overlay_area(body, auth::CARD_WIDTH, auth::card_height(state));
    auth::render_auth(state, frame, card, app.overlay.is_none());

    let hints = match state.auth.view.view() {
        View::Form(_) => vec![
            InputHint::new("Tab", "next"),
            InputHint::new("Enter", "select"),
            InputHint::new("Ctrl+T", "switch mode"),
            InputHint::new("Esc", "quit"),
        ],
        View::LoggedIn => vec![
            InputHint::new("Enter", "log out"),
            InputHint::new("Esc", "quit"),
        ],
    };
    render_hints(frame, area, &hints, Color::Cyan);

    app.overlay.render(frame, area);
}
