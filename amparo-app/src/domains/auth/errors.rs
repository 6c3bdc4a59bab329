use amparo_model::UserId;
use thiserror::Error;

use crate::infra::services::ProviderError;

use super::copy;
use super::types::{AuthField, AuthMode};

/// Required input missing. Raised before any provider call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub mode: AuthMode,
    pub missing: Vec<AuthField>,
}

impl ValidationError {
    pub fn message(&self) -> &'static str {
        match self.mode {
            AuthMode::SignIn => copy::FILL_ALL_FIELDS,
            AuthMode::SignUp => copy::FILL_REQUIRED_FIELDS,
            AuthMode::ForgotPassword => copy::ENTER_EMAIL,
        }
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            AuthMode::SignUp => copy::TITLE_INCOMPLETE,
            AuthMode::SignIn | AuthMode::ForgotPassword => copy::TITLE_ERROR,
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for ValidationError {}

/// Failure of one auth flow submission.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthFlowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Sign-in or password reset rejected; provider text shown verbatim.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Identity creation failed during sign-up.
    #[error("Falha na autenticação: {0}")]
    Identity(ProviderError),

    /// The identity exists but its profile row was not written. The identity
    /// is not rolled back.
    #[error("Falha ao criar perfil: {source}")]
    ProfileWrite {
        user_id: UserId,
        source: ProviderError,
    },
}

impl AuthFlowError {
    pub fn title(&self) -> &'static str {
        match self {
            AuthFlowError::Validation(err) => err.title(),
            AuthFlowError::Provider(_)
            | AuthFlowError::Identity(_)
            | AuthFlowError::ProfileWrite { .. } => copy::TITLE_ERROR,
        }
    }

    /// Alert body; falls back to a generic line when the provider sent none.
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            copy::UNKNOWN_ERROR.to_string()
        } else {
            message
        }
    }
}
