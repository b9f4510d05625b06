//! Admin login flow.
//!
//! `Idle -> Submitting -> (Succeeded | back to Idle with an error)`. Every
//! rejection collapses into one message, whatever the cause.

use thiserror::Error;
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::session::Session;

/// Shown for any failed login: bad credentials, unreachable API or server error alike.
pub const LOGIN_FAILED_MESSAGE: &str = "Invalid email or password. Please try again.";

/// Shown when the form is submitted with a blank field. No request is sent.
pub const LOGIN_FIELDS_REQUIRED: &str = "Email and password are required.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginPhase {
    #[default]
    Idle,
    Submitting,
    Succeeded,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LoginError {
    #[error("Email and password are required.")]
    MissingFields,

    #[error("A login attempt is already in progress")]
    InFlight,
}

/// LoginFlow
///
/// State of one login form. The form keeps its values through a failed
/// attempt so the user can correct and resubmit.
#[derive(Debug, Clone, Default)]
pub struct LoginFlow {
    phase: LoginPhase,
    email: String,
    password: String,
    error: Option<String>,
}

impl LoginFlow {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    pub fn phase(&self) -> LoginPhase {
        self.phase
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The submit control is disabled while a submission is in flight.
    pub fn can_submit(&self) -> bool {
        self.phase != LoginPhase::Submitting
    }

    /// idle -> submitting. Blank fields keep the flow idle with a blocking message.
    pub fn begin(&mut self) -> Result<(), LoginError> {
        if !self.can_submit() {
            return Err(LoginError::InFlight);
        }
        if self.email.trim().is_empty() || self.password.is_empty() {
            self.error = Some(LoginError::MissingFields.to_string());
            return Err(LoginError::MissingFields);
        }

        self.error = None;
        self.phase = LoginPhase::Submitting;
        Ok(())
    }

    fn succeed(&mut self) {
        self.phase = LoginPhase::Succeeded;
    }

    fn fail(&mut self) {
        self.phase = LoginPhase::Idle;
        self.error = Some(LOGIN_FAILED_MESSAGE.to_string());
    }

    /// submit
    ///
    /// Runs one attempt against the auth API. On success the issued credential
    /// is stored in `session`; the caller then navigates to the dashboard.
    /// Returns the phase the flow ended in.
    pub async fn submit(&mut self, api: &ApiClient, session: &Session) -> LoginPhase {
        if self.begin().is_err() {
            return self.phase;
        }

        match api.login(&self.email, &self.password).await {
            Ok(credential) => {
                session.activate(credential).await;
                self.succeed();
                info!("Admin login succeeded");
            }
            Err(e) => {
                warn!(error = %e, "Admin login failed");
                self.fail();
            }
        }

        self.phase
    }
}
