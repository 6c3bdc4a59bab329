//! Authentication domain
//!
//! Drives the sign-in, sign-up and password-reset forms through validation,
//! submission and the resulting alerts. The session itself is never written
//! here; it is observed through the session domain.

pub mod copy;
pub mod errors;
pub mod messages;
pub mod security;
pub mod types;
pub mod update;
pub mod update_handlers;

pub use errors::{AuthFlowError, ValidationError};
pub use messages::{AuthMessage, SignUpCompletion};
pub use types::{AlertAction, AuthAlert, AuthField, AuthForm, AuthMode, AuthUiState};

/// Authentication domain state.
#[derive(Debug, Default)]
pub struct AuthDomainState {
    /// Present only while the login route is mounted.
    pub ui: Option<AuthUiState>,
}

impl AuthDomainState {
    pub fn is_submitting(&self) -> bool {
        self.ui.as_ref().is_some_and(|ui| ui.is_submitting)
    }

    pub fn mode(&self) -> Option<AuthMode> {
        self.ui.as_ref().map(|ui| ui.mode)
    }
}
