use amparo_model::{Session, UserId};

use crate::common::ScreenId;

use super::errors::AuthFlowError;
use super::types::AuthField;

/// What a completed sign-up produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignUpCompletion {
    /// Identity and profile row written.
    Created(UserId),
    /// The provider withheld the identity until the email is confirmed.
    ConfirmationPending,
}

#[derive(Clone)]
pub enum AuthMessage {
    // Form editing
    UpdateField(AuthField, String),

    // Mode triggers
    ShowSignUp,
    ShowForgotPassword,
    BackToSignIn,

    /// Submit the form of the current mode.
    Submit,

    // Completions, tagged with the screen that issued them
    SignInCompleted(ScreenId, Result<Session, AuthFlowError>),
    SignUpCompleted(ScreenId, Result<SignUpCompletion, AuthFlowError>),
    ResetEmailCompleted(ScreenId, Result<(), AuthFlowError>),

    /// Dismiss the visible alert and apply its follow-up.
    AcknowledgeAlert,
}

impl AuthMessage {
    pub fn name(&self) -> &'static str {
        match self {
            Self::UpdateField(..) => "Auth::UpdateField",
            Self::ShowSignUp => "Auth::ShowSignUp",
            Self::ShowForgotPassword => "Auth::ShowForgotPassword",
            Self::BackToSignIn => "Auth::BackToSignIn",
            Self::Submit => "Auth::Submit",
            Self::SignInCompleted(..) => "Auth::SignInCompleted",
            Self::SignUpCompleted(..) => "Auth::SignUpCompleted",
            Self::ResetEmailCompleted(..) => "Auth::ResetEmailCompleted",
            Self::AcknowledgeAlert => "Auth::AcknowledgeAlert",
        }
    }
}

impl std::fmt::Debug for AuthMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // Field values may hold the password
            Self::UpdateField(field, value) => match field {
                AuthField::Password => {
                    write!(f, "UpdateField({field:?}, [REDACTED; {}])", value.len())
                }
                _ => write!(f, "UpdateField({field:?}, {value:?})"),
            },
            Self::SignInCompleted(screen, result) => write!(
                f,
                "SignInCompleted({screen}, {:?})",
                result.as_ref().map(Session::user_id)
            ),
            Self::SignUpCompleted(screen, result) => {
                write!(f, "SignUpCompleted({screen}, {result:?})")
            }
            Self::ResetEmailCompleted(screen, result) => {
                write!(f, "ResetEmailCompleted({screen}, {result:?})")
            }
            other => f.write_str(other.name()),
        }
    }
}
