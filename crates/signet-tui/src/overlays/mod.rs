//! Overlay modules for the TUI.
//!
//! Overlays are modal UI components that temporarily take over keyboard input.
//! Each overlay is self-contained: it owns its state, key handler, and render function.
//!
//! - `notice.rs`: Success / error dialog shown after a submit
//! - `render_utils.rs`: Shared rendering utilities for overlays

pub mod notice;
pub mod render_utils;

use crossterm::event::KeyEvent;
pub use notice::NoticeState;
use ratatui::Frame;
use ratatui::layout::Rect;
use signet_core::flow::Notice;

use crate::effects::UiEffect;

/// Requests to open a new overlay.
#[derive(Debug)]
pub enum OverlayRequest {
    Notice(Notice),
}

/// Transition returned by overlay key handlers.
#[derive(Debug)]
pub enum OverlayTransition {
    Stay,
    Close,
}

/// Update returned by overlay key handlers.
#[derive(Debug)]
pub struct OverlayUpdate {
    pub transition: OverlayTransition,
    pub effects: Vec<UiEffect>,
}

impl OverlayUpdate {
    fn new(transition: OverlayTransition) -> Self {
        Self {
            transition,
            effects: Vec::new(),
        }
    }

    pub fn stay() -> Self {
        Self::new(OverlayTransition::Stay)
    }

    pub fn close() -> Self {
        Self::new(OverlayTransition::Close)
    }

    #[must_use]
    pub fn with_ui_effects(mut self, effects: Vec<UiEffect>) -> Self {
        self.effects = effects;
        self
    }
}

#[derive(Debug)]
pub enum Overlay {
    Notice(NoticeState),
}

impl Overlay {
    pub fn open(request: OverlayRequest) -> Self {
        match request {
            OverlayRequest::Notice(notice) => Overlay::Notice(NoticeState::open(notice)),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        match self {
            Overlay::Notice(n) => n.render(frame, area),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> OverlayUpdate {
        match self {
            Overlay::Notice(n) => n.handle_key(key),
        }
    }
}

/// Routes a key to the active overlay, if any.
pub fn handle_overlay_key(overlay: &mut Option<Overlay>, key: KeyEvent) -> Option<OverlayUpdate> {
    overlay.as_mut().map(|o| o.handle_key(key))
}

/// Extension trait for `Option<Overlay>` providing convenience render helpers.
pub trait OverlayExt {
    /// Renders the overlay if one is active.
    fn render(&self, frame: &mut Frame, area: Rect);
}

impl OverlayExt for Option<Overlay> {
    fn render(&self, frame: &mut Frame, area: Rect) {
        if let Some(overlay) = self {
            overlay.render(frame, area);
        }
    }
}
