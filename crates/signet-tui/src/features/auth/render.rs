//! Auth feature view.
//!
//! Rendering functions for the sign-in / sign-up form and the logged-in
//! view.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use signet_core::flow::{FormMode, View};

use super::state::Focus;
use crate::input::TextField;
use crate::state::TuiState;

/// Card width on both views.
pub const CARD_WIDTH: u16 = 48;
/// Card height of the form view.
pub const FORM_HEIGHT: u16 = 14;
/// Card height of the logged-in view.
pub const LOGGED_IN_HEIGHT: u16 = 7;

const ACCENT: Color = Color::Cyan;
const MASK: char = '•';

/// Spinner frames shown on the busy submit button.
const SPINNER_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];

/// Height of the card for the current view.
pub fn card_height(tui: &TuiState) -> u16 {
    match tui.auth.view.view() {
        View::Form(_) => FORM_HEIGHT,
        View::LoggedIn => LOGGED_IN_HEIGHT,
    }
}

/// Renders the auth card into `area`.
///
/// With `show_cursor`, the terminal cursor is placed in the focused field.
pub fn render_auth(tui: &TuiState, frame: &mut Frame, area: Rect, show_cursor: bool) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let inner = Rect::new(
        inner.x + 1,
        inner.y,
        inner.width.saturating_sub(2),
        inner.height,
    );

    match tui.auth.view.view() {
        View::Form(mode) => render_form(tui, frame, inner, mode, show_cursor),
        View::LoggedIn => render_logged_in(tui, frame, inner),
    }
}

fn render_form(tui: &TuiState, frame: &mut Frame, area: Rect, mode: FormMode, show_cursor: bool) {
    let auth = &tui.auth;
    let rows = Layout::vertical([
        Constraint::Length(1), // title
        Constraint::Length(1),
        Constraint::Length(3), // username
        Constraint::Length(3), // password
        Constraint::Length(1),
        Constraint::Length(1), // button
        Constraint::Length(1),
        Constraint::Length(1), // switch link
    ])
    .split(area);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            mode.title(),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center),
        rows[0],
    );

    let username_cursor = render_field(
        frame,
        rows[2],
        &auth.username,
        "Username",
        false,
        auth.focus == Focus::Username,
    );
    let password_cursor = render_field(
        frame,
        rows[3],
        &auth.password,
        "Password",
        true,
        auth.focus == Focus::Password,
    );

    let label = if tui.tasks.submit.is_running() {
        let spinner = SPINNER_FRAMES[tui.spinner_frame % SPINNER_FRAMES.len()];
        format!("{spinner} Please wait")
    } else {
        mode.title().to_string()
    };
    render_button(frame, rows[5], &label, auth.focus == Focus::Submit);

    let link_style = if auth.focus == Focus::SwitchMode {
        Style::default()
            .fg(ACCENT)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED | Modifier::REVERSED)
    } else {
        Style::default().fg(ACCENT).add_modifier(Modifier::UNDERLINED)
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(mode.switch_prompt(), link_style)))
            .alignment(Alignment::Center),
        rows[7],
    );

    if show_cursor && let Some(position) = username_cursor.or(password_cursor) {
        frame.set_cursor_position(position);
    }
}

fn render_logged_in(tui: &TuiState, frame: &mut Frame, area: Rect) {
    let rows = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1), // welcome
        Constraint::Length(1),
        Constraint::Length(1), // logout
    ])
    .split(area);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            welcome_message(tui.auth.view.display_name()),
            Style::default().add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center),
        rows[1],
    );
    render_button(frame, rows[3], "Logout", tui.auth.focus == Focus::Logout);
}

/// Greeting on the logged-in view.
pub fn welcome_message(name: Option<&str>) -> String {
    match name {
        Some(name) => format!("Welcome, {name}!"),
        None => "Welcome!".to_string(),
    }
}

/// Renders a bordered input box and returns the cursor position if focused.
fn render_field(
    frame: &mut Frame,
    area: Rect,
    field: &TextField,
    placeholder: &str,
    mask: bool,
    focused: bool,
) -> Option<(u16, u16)> {
    let border = if focused { ACCENT } else { Color::DarkGray };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if field.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                placeholder,
                Style::default().fg(Color::DarkGray),
            )),
            inner,
        );
        return focused.then_some((inner.x, inner.y));
    }

    let shown = if mask {
        MASK.to_string().repeat(field.text().chars().count())
    } else {
        field.text().to_string()
    };

    // Scroll horizontally so the cursor stays visible.
    let width = usize::from(inner.width.max(1));
    let cursor_col = field.cursor_column(mask);
    let offset = cursor_col.saturating_sub(width - 1);
    let offset_u16 = u16::try_from(offset).unwrap_or(u16::MAX);

    frame.render_widget(
        Paragraph::new(Span::raw(shown)).scroll((0, offset_u16)),
        inner,
    );

    let x = u16::try_from(cursor_col - offset).unwrap_or(0);
    focused.then_some((inner.x + x, inner.y))
}

fn render_button(frame: &mut Frame, area: Rect, label: &str, focused: bool) {
    let style = if focused {
        Style::default()
            .fg(Color::Black)
            .bg(ACCENT)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(ACCENT)
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(format!("[ {label} ]"), style)))
            .alignment(Alignment::Center),
        area,
    );
}
