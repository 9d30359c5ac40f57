//! Sign-in / sign-up view state machine.
//!
//! Two view states exist: the form (in either mode) and the logged-in view.
//! Every transition is a method on [`ViewState`]; store I/O never happens
//! here. A submission is split in two halves:
//!
//! ```text
//! begin_submit()  -> StoreRequest     (validation, no I/O)
//! perform()       -> SubmitOutcome    (store calls, async)
//! complete()      -> Notice           (state transition)
//! ```
//!
//! Both the async controller and the terminal reducer drive these halves,
//! so the transition rules live in one place.

use std::fmt;

use crate::session::SessionFlag;
use crate::store::{StoreError, UserStore};

/// Which form is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    SignIn,
    SignUp,
}

impl FormMode {
    pub fn toggled(self) -> Self {
        match self {
            FormMode::SignIn => FormMode::SignUp,
            FormMode::SignUp => FormMode::SignIn,
        }
    }

    /// Heading and primary button label.
    pub fn title(self) -> &'static str {
        match self {
            FormMode::SignIn => "Sign In",
            FormMode::SignUp => "Sign Up",
        }
    }

    /// Label of the link that switches to the other mode.
    pub fn switch_prompt(self) -> &'static str {
        match self {
            FormMode::SignIn => "Don't have an account? Sign up for free",
            FormMode::SignUp => "Already have an account? Sign in",
        }
    }
}

/// The rendered screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Form(FormMode),
    LoggedIn,
}

/// Username and password as entered.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Only emptiness is checked; whitespace counts as content.
    ///
    /// # Errors
    /// Returns [`AuthError::Validation`] if either field is empty.
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.username.is_empty() || self.password.is_empty() {
            return Err(AuthError::Validation);
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Failure of a single submission. Display text is the user-visible message.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Please fill up the required fields")]
    Validation,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        AuthError::Store(StoreError::Backend(err))
    }
}

/// Store call requested by a validated submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreRequest {
    Authenticate(Credentials),
    Register(Credentials),
}

impl StoreRequest {
    pub fn mode(&self) -> FormMode {
        match self {
            StoreRequest::Authenticate(_) => FormMode::SignIn,
            StoreRequest::Register(_) => FormMode::SignUp,
        }
    }

    pub fn username(&self) -> &str {
        match self {
            StoreRequest::Authenticate(c) | StoreRequest::Register(c) => &c.username,
        }
    }
}

/// Result of a completed store call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Credentials matched and the session flag was persisted.
    SignedIn,
    /// Credentials did not match.
    Rejected,
    /// The user was created.
    Registered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// User-visible message produced by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }

    /// Dialog title.
    pub fn title(&self) -> &'static str {
        match self.kind {
            NoticeKind::Success => "Success",
            NoticeKind::Error => "Error",
        }
    }
}

impl From<&AuthError> for Notice {
    fn from(err: &AuthError) -> Self {
        Notice::error(err.to_string())
    }
}

/// In-memory view state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub mode: FormMode,
    pub username: String,
    pub password: String,
    pub logged_in: bool,
}

impl ViewState {
    /// State at launch. Only the flag survives a restart, never the username.
    pub fn restored(session_active: bool) -> Self {
        Self {
            logged_in: session_active,
            ..Self::default()
        }
    }

    pub fn view(&self) -> View {
        if self.logged_in {
            View::LoggedIn
        } else {
            View::Form(self.mode)
        }
    }

    /// Flips the form mode. Entered values are kept.
    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
    }

    /// Validates the fields and builds the store call for the current mode.
    ///
    /// # Errors
    /// Returns [`AuthError::Validation`] if a field is empty.
    pub fn begin_submit(&self) -> Result<StoreRequest, AuthError> {
        let credentials = Credentials::new(self.username.clone(), self.password.clone());
        credentials.validate()?;
        Ok(match self.mode {
            FormMode::SignIn => StoreRequest::Authenticate(credentials),
            FormMode::SignUp => StoreRequest::Register(credentials),
        })
    }

    /// Applies the result of a store call and returns the notice to show.
    ///
    /// Failures leave the state untouched.
    pub fn complete(&mut self, result: Result<SubmitOutcome, AuthError>) -> Notice {
        match result {
            Ok(SubmitOutcome::SignedIn) => {
                self.logged_in = true;
                Notice::success("Logged in successfully")
            }
            Ok(SubmitOutcome::Rejected) => Notice::from(&AuthError::InvalidCredentials),
            Ok(SubmitOutcome::Registered) => {
                self.mode = FormMode::SignIn;
                Notice::success("Registration successful")
            }
            Err(err) => Notice::from(&err),
        }
    }

    /// Returns to the sign-in form and forgets the entered values.
    pub fn logout(&mut self) {
        self.logged_in = false;
        self.mode = FormMode::SignIn;
        self.username.clear();
        self.password.clear();
    }

    /// Name shown on the logged-in view, if known in this process.
    pub fn display_name(&self) -> Option<&str> {
        (!self.username.is_empty()).then_some(self.username.as_str())
    }
}

/// Executes a store request: one store call, plus the flag write on a
/// successful sign-in.
///
/// # Errors
/// Returns [`AuthError::Store`] if the store or the flag write fails.
pub async fn perform(
    users: &dyn UserStore,
    session: &SessionFlag,
    request: StoreRequest,
) -> Result<SubmitOutcome, AuthError> {
    match request {
        StoreRequest::Authenticate(c) => {
            if users.authenticate(&c.username, &c.password).await? {
                session.mark_logged_in().await?;
                Ok(SubmitOutcome::SignedIn)
            } else {
                Ok(SubmitOutcome::Rejected)
            }
        }
        StoreRequest::Register(c) => {
            users.register(&c.username, &c.password).await?;
            Ok(SubmitOutcome::Registered)
        }
    }
}
