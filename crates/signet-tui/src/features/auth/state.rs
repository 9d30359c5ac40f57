//! Auth screen state.

use signet_core::flow::{View, ViewState};

use crate::input::TextField;

/// Focusable element on the current view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Username,
    Password,
    Submit,
    SwitchMode,
    Logout,
}

const FORM_ORDER: [Focus; 4] = [
    Focus::Username,
    Focus::Password,
    Focus::Submit,
    Focus::SwitchMode,
];

#[derive(Debug)]
pub struct AuthState {
    /// Mode, logged-in flag, and the values last handed to the flow.
    pub view: ViewState,
    pub username: TextField,
    pub password: TextField,
    pub focus: Focus,
}

impl AuthState {
    pub fn new(view: ViewState) -> Self {
        let mut username = TextField::default();
        username.set_text(&view.username);
        let mut password = TextField::default();
        password.set_text(&view.password);
        let focus = initial_focus(view.view());
        Self {
            view,
            username,
            password,
            focus,
        }
    }

    /// Copies the edited values into the view state.
    pub fn commit_fields(&mut self) {
        self.view.username = self.username.text().to_string();
        self.view.password = self.password.text().to_string();
    }

    /// Resets focus to the first element of the current view.
    pub fn reset_focus(&mut self) {
        self.focus = initial_focus(self.view.view());
    }

    pub fn focus_next(&mut self) {
        self.focus = step(self.focus, 1);
    }

    pub fn focus_prev(&mut self) {
        self.focus = step(self.focus, FORM_ORDER.len() - 1);
    }

    /// The field with keyboard focus, if any.
    pub fn focused_field_mut(&mut self) -> Option<&mut TextField> {
        match self.focus {
            Focus::Username => Some(&mut self.username),
            Focus::Password => Some(&mut self.password),
            Focus::Submit | Focus::SwitchMode | Focus::Logout => None,
        }
    }

    /// Applies a logout: sign-in form with empty fields.
    pub fn logout(&mut self) {
        self.view.logout();
        self.username.clear();
        self.password.clear();
        self.reset_focus();
    }
}

fn initial_focus(view: View) -> Focus {
    match view {
        View::Form(_) => Focus::Username,
        View::LoggedIn => Focus::Logout,
    }
}

fn step(focus: Focus, by: usize) -> Focus {
    match FORM_ORDER.iter().position(|f| *f == focus) {
        Some(i) => FORM_ORDER[(i + by) % FORM_ORDER.len()],
        None => focus,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_focus_follows_view() {
        assert_eq!(
            AuthState::new(ViewState::restored(false)).focus,
            Focus::Username
        );
        assert_eq!(AuthState::new(ViewState::restored(true)).focus, Focus::Logout);
    }

    #[test]
    fn test_focus_wraps_both_ways() {
        let mut auth = AuthState::new(ViewState::default());

        auth.focus_prev();
        assert_eq!(auth.focus, Focus::SwitchMode);
        auth.focus_next();
        assert_eq!(auth.focus, Focus::Username);
        auth.focus_next();
        auth.focus_next();
        assert_eq!(auth.focus, Focus::Submit);
    }

    #[test]
    fn test_logged_in_focus_does_not_move() {
        let mut auth = AuthState::new(ViewState::restored(true));
        auth.focus_next();
        assert_eq!(auth.focus, Focus::Logout);
    }

    #[test]
    fn test_logout_clears_fields() {
        let mut auth = AuthState::new(ViewState::restored(true));
        auth.username.set_text("alice");
        auth.password.set_text("pw1");
        auth.commit_fields();

        auth.logout();

        assert!(auth.username.is_empty());
        assert!(auth.password.is_empty());
        assert_eq!(auth.view, ViewState::default());
        assert_eq!(auth.focus, Focus::Username);
    }
}
