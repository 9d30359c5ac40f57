//! Modal notice dialog ("Success" / "Error").

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Paragraph, Wrap};
use signet_core::flow::{Notice, NoticeKind};
use unicode_width::UnicodeWidthStr;

use super::OverlayUpdate;
use super::render_utils::{
    InputHint, calculate_overlay_area, inner_area, render_hints, render_overlay_container,
};
use crate::effects::UiEffect;

const MAX_WIDTH: u16 = 50;

#[derive(Debug, Clone)]
pub struct NoticeState {
    pub notice: Notice,
}

impl NoticeState {
    pub fn open(notice: Notice) -> Self {
        Self { notice }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> OverlayUpdate {
        if matches!(key.kind, KeyEventKind::Release) {
            return OverlayUpdate::stay();
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Enter | KeyCode::Esc => OverlayUpdate::close(),
            KeyCode::Char('c') if ctrl => {
                OverlayUpdate::close().with_ui_effects(vec![UiEffect::Quit])
            }
            _ => OverlayUpdate::stay(),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let color = match self.notice.kind {
            NoticeKind::Success => Color::Green,
            NoticeKind::Error => Color::Red,
        };

        let text_width = MAX_WIDTH.saturating_sub(4).max(1);
        let message_lines = wrapped_line_count(&self.notice.message, text_width);
        // border + blank + message + blank + hints + border
        let height = message_lines + 5;

        let popup = calculate_overlay_area(area, MAX_WIDTH, height);
        render_overlay_container(frame, popup, self.notice.title(), color);

        let inner = inner_area(popup);
        let body = Rect::new(inner.x, inner.y + 1, inner.width, message_lines);
        frame.render_widget(
            Paragraph::new(Line::from(self.notice.message.as_str()))
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::White))
                .wrap(Wrap { trim: true }),
            body.intersection(inner),
        );

        render_hints(frame, inner, &[InputHint::new("Enter", "ok")], color);
    }
}

fn wrapped_line_count(text: &str, width: u16) -> u16 {
    let width = usize::from(width);
    let lines = text.width().div_ceil(width).max(1);
    u16::try_from(lines).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlays::OverlayTransition;

    #[test]
    fn test_enter_and_esc_close() {
        for code in [KeyCode::Enter, KeyCode::Esc] {
            let mut state = NoticeState::open(Notice::success("Registration successful"));
            let update = state.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
            assert!(matches!(update.transition, OverlayTransition::Close));
            assert!(update.effects.is_empty());
        }
    }

    #[test]
    fn test_other_keys_stay_open() {
        let mut state = NoticeState::open(Notice::error("Invalid credentials"));
        let update = state.handle_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE));
        assert!(matches!(update.transition, OverlayTransition::Stay));
    }

    #[test]
    fn test_ctrl_c_closes_and_quits() {
        let mut state = NoticeState::open(Notice::error("Invalid credentials"));
        let update = state.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(matches!(update.transition, OverlayTransition::Close));
        assert!(matches!(update.effects.as_slice(), [UiEffect::Quit]));
    }

    #[test]
    fn test_wrapped_line_count() {
        assert_eq!(wrapped_line_count("", 10), 1);
        assert_eq!(wrapped_line_count("0123456789", 10), 1);
        assert_eq!(wrapped_line_count("0123456789x", 10), 2);
    }
}
