//! Auth feature reducer.
//!
//! Maps keys to form edits and flow transitions. Store calls leave as
//! effects; their results come back through [`handle_submit_result`].

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use signet_core::flow::{AuthError, Notice, SubmitOutcome, View};

use super::state::{AuthState, Focus};
use crate::effects::UiEffect;
use crate::overlays::OverlayRequest;
use crate::state::TuiState;

/// Handles a key while no overlay is open.
pub fn handle_main_key(
    tui: &mut TuiState,
    key: KeyEvent,
) -> (Vec<UiEffect>, Option<OverlayRequest>) {
    if matches!(key.kind, KeyEventKind::Release) {
        return (vec![], None);
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Esc => return (vec![UiEffect::Quit], None),
        KeyCode::Char('c') if ctrl => return (vec![UiEffect::Quit], None),
        _ => {}
    }

    match tui.auth.view.view() {
        View::LoggedIn => match key.code {
            KeyCode::Enter => (logout(tui), None),
            KeyCode::Char('l') if ctrl => (logout(tui), None),
            _ => (vec![], None),
        },
        View::Form(_) => handle_form_key(tui, key, ctrl),
    }
}

fn handle_form_key(
    tui: &mut TuiState,
    key: KeyEvent,
    ctrl: bool,
) -> (Vec<UiEffect>, Option<OverlayRequest>) {
    match key.code {
        KeyCode::Char('t') if ctrl => {
            tui.auth.view.toggle_mode();
            (vec![], None)
        }
        KeyCode::Tab | KeyCode::Down => {
            tui.auth.focus_next();
            (vec![], None)
        }
        KeyCode::BackTab | KeyCode::Up => {
            tui.auth.focus_prev();
            (vec![], None)
        }
        KeyCode::Enter => match tui.auth.focus {
            Focus::Username => {
                tui.auth.focus = Focus::Password;
                (vec![], None)
            }
            Focus::Password | Focus::Submit => submit(tui),
            Focus::SwitchMode => {
                tui.auth.view.toggle_mode();
                (vec![], None)
            }
            Focus::Logout => (vec![], None),
        },
        _ => {
            if let Some(field) = tui.auth.focused_field_mut() {
                field.input(key);
            }
            (vec![], None)
        }
    }
}

/// Validates the form and issues the store request.
///
/// Ignored while another store task is in flight.
fn submit(tui: &mut TuiState) -> (Vec<UiEffect>, Option<OverlayRequest>) {
    if tui.tasks.is_any_running() {
        return (vec![], None);
    }

    tui.auth.commit_fields();
    match tui.auth.view.begin_submit() {
        Ok(request) => {
            let task = tui.task_seq.next_id();
            tui.tasks.submit.begin(task);
            (vec![UiEffect::Submit { task, request }], None)
        }
        Err(err) => (vec![], Some(OverlayRequest::Notice(Notice::from(&err)))),
    }
}

/// Leaves the logged-in view immediately; the flag is cleared in the
/// background.
fn logout(tui: &mut TuiState) -> Vec<UiEffect> {
    tui.auth.logout();
    let task = tui.task_seq.next_id();
    tui.tasks.logout.begin(task);
    vec![UiEffect::ClearSession { task }]
}

/// Applies a finished store request and returns the notice to display.
pub fn handle_submit_result(
    auth: &mut AuthState,
    result: Result<SubmitOutcome, AuthError>,
) -> OverlayRequest {
    let notice = auth.view.complete(result);
    if !notice.is_error() {
        auth.reset_focus();
    }
    OverlayRequest::Notice(notice)
}

/// Inserts pasted text into the focused field.
pub fn handle_paste(auth: &mut AuthState, text: &str) {
    if let Some(field) = auth.focused_field_mut() {
        field.insert_str(text);
    }
}
