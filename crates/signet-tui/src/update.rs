//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.
//!
//! This is the single source of truth for how events modify state.

use crossterm::event::{Event, KeyEvent};

use crate::auth;
use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::overlays::{self, Overlay, OverlayRequest, OverlayTransition, OverlayUpdate};
use crate::state::AppState;

/// The main reducer function.
///
/// Takes the current state and an event, mutates state, and returns effects
/// for the runtime to execute.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            app.tui.spinner_frame = app.tui.spinner_frame.wrapping_add(1);
            vec![]
        }
        UiEvent::Frame { width, height } => {
            app.tui.terminal_size = (width, height);
            vec![]
        }
        UiEvent::Terminal(term_event) => handle_terminal_event(app, term_event),
        UiEvent::TaskStarted { kind, started } => {
            app.tui.tasks.state_mut(kind).on_started(&started);
            vec![]
        }
        UiEvent::TaskCompleted { kind, completed } => {
            let ok = app.tui.tasks.state_mut(kind).finish_if_active(completed.id);
            if ok {
                update(app, *completed.result)
            } else {
                vec![]
            }
        }
        UiEvent::SubmitFinished { result } => {
            let request = auth::handle_submit_result(&mut app.tui.auth, result);
            open_overlay_request(app, request);
            vec![]
        }
        UiEvent::SessionCleared => vec![],
    }
}

fn apply_overlay_update(app: &mut AppState, update: OverlayUpdate) -> Vec<UiEffect> {
    match update.transition {
        OverlayTransition::Stay => {}
        OverlayTransition::Close => app.overlay = None,
    }
    update.effects
}

fn open_overlay_request(app: &mut AppState, request: OverlayRequest) {
    app.overlay = Some(Overlay::open(request));
}

// ============================================================================
// Terminal Event Handlers
// ============================================================================

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) => handle_key(app, key),
        Event::Paste(text) => {
            if app.overlay.is_none() {
                auth::handle_paste(&mut app.tui.auth, &text);
            }
            vec![]
        }
        _ => vec![],
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    // Try to dispatch to the active overlay
    if let Some(update) = overlays::handle_overlay_key(&mut app.overlay, key) {
        return apply_overlay_update(app, update);
    }

    let (effects, overlay_request) = auth::handle_main_key(&mut app.tui, key);
    if let Some(request) = overlay_request
        && app.overlay.is_none()
    {
        open_overlay_request(app, request);
    }

    effects
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEventKind, KeyModifiers};
    use signet_core::flow::{
        AuthError, Credentials, FormMode, Notice, StoreRequest, SubmitOutcome, View, ViewState,
    };
    use signet_core::store::StoreError;

    use super::*;
    use crate::auth::Focus;
    use crate::common::{TaskCompleted, TaskId, TaskKind, TaskStarted};

    fn app() -> AppState {
        AppState::new(ViewState::restored(false))
    }

    fn press(app: &mut AppState, code: KeyCode) -> Vec<UiEffect> {
        update(
            app,
            UiEvent::Terminal(Event::Key(KeyEvent::new(code, KeyModifiers::NONE))),
        )
    }

    fn ctrl(app: &mut AppState, c: char) -> Vec<UiEffect> {
        update(
            app,
            UiEvent::Terminal(Event::Key(KeyEvent::new(
                KeyCode::Char(c),
                KeyModifiers::CONTROL,
            ))),
        )
    }

    fn type_text(app: &mut AppState, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn fill(app: &mut AppState, username: &str, password: &str) {
        app.tui.auth.focus = Focus::Username;
        type_text(app, username);
        press(app, KeyCode::Enter);
        type_text(app, password);
    }

    fn submit_task(effects: &[UiEffect]) -> (TaskId, StoreRequest) {
        match effects {
            [UiEffect::Submit { task, request }] => (*task, request.clone()),
            other => panic!("expected a single submit effect, got {other:?}"),
        }
    }

    fn complete(
        app: &mut AppState,
        kind: TaskKind,
        id: TaskId,
        event: UiEvent,
    ) -> Vec<UiEffect> {
        update(
            app,
            UiEvent::TaskCompleted {
                kind,
                completed: TaskCompleted {
                    id,
                    result: Box::new(event),
                },
            },
        )
    }

    fn notice(app: &AppState) -> Option<&Notice> {
        match &app.overlay {
            Some(Overlay::Notice(state)) => Some(&state.notice),
            None => None,
        }
    }

    #[test]
    fn test_restored_session_starts_on_logged_in_view() {
        let app = AppState::new(ViewState::restored(true));
        assert_eq!(app.tui.auth.view.view(), View::LoggedIn);
        assert_eq!(app.tui.auth.focus, Focus::Logout);
    }

    #[test]
    fn test_enter_on_password_submits_sign_in() {
        let mut app = app();
        fill(&mut app, "alice", "pw1");

        let effects = press(&mut app, KeyCode::Enter);

        let (_, request) = submit_task(&effects);
        assert_eq!(
            request,
            StoreRequest::Authenticate(Credentials::new("alice", "pw1"))
        );
        assert!(app.tui.tasks.submit.is_running());
    }

    #[test]
    fn test_empty_submit_shows_validation_error_without_effects() {
        let mut app = app();
        app.tui.auth.focus = Focus::Submit;

        let effects = press(&mut app, KeyCode::Enter);

        assert!(effects.is_empty());
        assert!(!app.tui.tasks.is_any_running());
        assert_eq!(
            notice(&app),
            Some(&Notice::error("Please fill up the required fields"))
        );
    }

    #[test]
    fn test_double_submit_issues_one_request() {
        let mut app = app();
        fill(&mut app, "alice", "pw1");

        let first = press(&mut app, KeyCode::Enter);
        let second = press(&mut app, KeyCode::Enter);

        let (task, _) = submit_task(&first);
        assert!(second.is_empty());

        complete(
            &mut app,
            TaskKind::Submit,
            task,
            UiEvent::SubmitFinished {
                result: Ok(SubmitOutcome::SignedIn),
            },
        );
        assert_eq!(app.tui.auth.view.view(), View::LoggedIn);
        assert!(!app.tui.tasks.is_any_running());
    }

    #[test]
    fn test_task_started_keeps_submit_in_flight() {
        let mut app = app();
        fill(&mut app, "alice", "pw1");
        let (task, _) = submit_task(&press(&mut app, KeyCode::Enter));

        update(
            &mut app,
            UiEvent::TaskStarted {
                kind: TaskKind::Submit,
                started: TaskStarted { id: task },
            },
        );

        assert_eq!(app.tui.tasks.submit.active, Some(task));
    }

    #[test]
    fn test_stale_result_is_ignored() {
        let mut app = app();
        fill(&mut app, "alice", "pw1");
        let (task, _) = submit_task(&press(&mut app, KeyCode::Enter));

        complete(
            &mut app,
            TaskKind::Submit,
            TaskId(task.0 + 100),
            UiEvent::SubmitFinished {
                result: Ok(SubmitOutcome::SignedIn),
            },
        );

        assert_eq!(app.tui.auth.view.view(), View::Form(FormMode::SignIn));
        assert!(notice(&app).is_none());
        assert!(app.tui.tasks.submit.is_running());
    }

    #[test]
    fn test_signed_in_result_shows_welcome_and_success() {
        let mut app = app();
        fill(&mut app, "alice", "pw1");
        let (task, _) = submit_task(&press(&mut app, KeyCode::Enter));

        complete(
            &mut app,
            TaskKind::Submit,
            task,
            UiEvent::SubmitFinished {
                result: Ok(SubmitOutcome::SignedIn),
            },
        );

        assert_eq!(app.tui.auth.view.view(), View::LoggedIn);
        assert_eq!(app.tui.auth.view.display_name(), Some("alice"));
        assert_eq!(app.tui.auth.focus, Focus::Logout);
        assert_eq!(notice(&app), Some(&Notice::success("Logged in successfully")));
    }

    #[test]
    fn test_rejected_result_keeps_form_and_focus() {
        let mut app = app();
        fill(&mut app, "alice", "bad");
        let (task, _) = submit_task(&press(&mut app, KeyCode::Enter));

        complete(
            &mut app,
            TaskKind::Submit,
            task,
            UiEvent::SubmitFinished {
                result: Ok(SubmitOutcome::Rejected),
            },
        );

        assert_eq!(app.tui.auth.view.view(), View::Form(FormMode::SignIn));
        assert_eq!(app.tui.auth.focus, Focus::Password);
        assert_eq!(notice(&app), Some(&Notice::error("Invalid credentials")));
    }

    #[test]
    fn test_duplicate_user_message_shown_on_sign_up_form() {
        let mut app = app();
        ctrl(&mut app, 't');
        fill(&mut app, "bob", "pw2");
        let (task, request) = submit_task(&press(&mut app, KeyCode::Enter));
        assert_eq!(request, StoreRequest::Register(Credentials::new("bob", "pw2")));

        complete(
            &mut app,
            TaskKind::Submit,
            task,
            UiEvent::SubmitFinished {
                result: Err(AuthError::Store(StoreError::DuplicateUser(
                    "bob exists".to_string(),
                ))),
            },
        );

        assert_eq!(app.tui.auth.view.view(), View::Form(FormMode::SignUp));
        let shown = notice(&app).unwrap();
        assert_eq!(shown.title(), "Error");
        assert_eq!(shown.message, "bob exists");
    }

    #[test]
    fn test_registration_returns_to_sign_in() {
        let mut app = app();
        ctrl(&mut app, 't');
        fill(&mut app, "bob", "pw2");
        let (task, _) = submit_task(&press(&mut app, KeyCode::Enter));

        complete(
            &mut app,
            TaskKind::Submit,
            task,
            UiEvent::SubmitFinished {
                result: Ok(SubmitOutcome::Registered),
            },
        );

        assert_eq!(app.tui.auth.view.view(), View::Form(FormMode::SignIn));
        assert!(!app.tui.auth.view.logged_in);
        assert_eq!(app.tui.auth.username.text(), "bob");
        assert_eq!(notice(&app), Some(&Notice::success("Registration successful")));
    }

    #[test]
    fn test_notice_swallows_keys_until_dismissed() {
        let mut app = app();
        app.tui.auth.focus = Focus::Submit;
        press(&mut app, KeyCode::Enter);
        assert!(notice(&app).is_some());

        // Esc closes the dialog instead of quitting.
        let effects = press(&mut app, KeyCode::Esc);
        assert!(effects.is_empty());
        assert!(notice(&app).is_none());
        assert!(!app.tui.should_quit);
    }

    #[test]
    fn test_toggle_keeps_field_values() {
        let mut app = app();
        fill(&mut app, "alice", "pw1");

        ctrl(&mut app, 't');

        assert_eq!(app.tui.auth.view.view(), View::Form(FormMode::SignUp));
        assert_eq!(app.tui.auth.username.text(), "alice");
        assert_eq!(app.tui.auth.password.text(), "pw1");
    }

    #[test]
    fn test_enter_on_switch_link_toggles_mode() {
        let mut app = app();
        app.tui.auth.focus = Focus::SwitchMode;

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.tui.auth.view.view(), View::Form(FormMode::SignUp));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.tui.auth.view.view(), View::Form(FormMode::SignIn));
    }

    #[test]
    fn test_tab_cycles_focus() {
        let mut app = app();

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.tui.auth.focus, Focus::Password);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.tui.auth.focus, Focus::Submit);
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.tui.auth.focus, Focus::Username);
    }

    #[test]
    fn test_logout_clears_view_and_issues_clear_session() {
        let mut app = AppState::new(ViewState::restored(true));

        let effects = press(&mut app, KeyCode::Enter);

        let [UiEffect::ClearSession { task }] = effects.as_slice() else {
            panic!("expected ClearSession, got {effects:?}");
        };
        assert_eq!(app.tui.auth.view.view(), View::Form(FormMode::SignIn));
        assert_eq!(app.tui.auth.focus, Focus::Username);
        assert!(app.tui.tasks.logout.is_running());

        complete(&mut app, TaskKind::Logout, *task, UiEvent::SessionCleared);
        assert!(!app.tui.tasks.is_any_running());
    }

    #[test]
    fn test_submit_waits_for_pending_logout() {
        let mut app = AppState::new(ViewState::restored(true));
        ctrl(&mut app, 'l');
        assert!(app.tui.tasks.logout.is_running());

        fill(&mut app, "alice", "pw1");
        let effects = press(&mut app, KeyCode::Enter);

        assert!(effects.is_empty());
    }

    #[test]
    fn test_paste_goes_to_focused_field() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);

        update(
            &mut app,
            UiEvent::Terminal(Event::Paste("secret\n".to_string())),
        );

        assert_eq!(app.tui.auth.password.text(), "secret");
        assert!(app.tui.auth.username.is_empty());
    }

    #[test]
    fn test_esc_and_ctrl_c_quit() {
        let mut app = app();
        assert!(matches!(
            press(&mut app, KeyCode::Esc).as_slice(),
            [UiEffect::Quit]
        ));
        assert!(matches!(ctrl(&mut app, 'c').as_slice(), [UiEffect::Quit]));
    }

    #[test]
    fn test_key_release_is_ignored() {
        let mut app = app();
        let mut key = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;

        update(&mut app, UiEvent::Terminal(Event::Key(key)));

        assert!(app.tui.auth.username.is_empty());
    }

    #[test]
    fn test_tick_and_frame_update_housekeeping() {
        let mut app = app();
        update(&mut app, UiEvent::Tick);
        update(
            &mut app,
            UiEvent::Frame {
                width: 80,
                height: 24,
            },
        );

        assert_eq!(app.tui.spinner_frame, 1);
        assert_eq!(app.tui.terminal_size, (80, 24));
    }
}
