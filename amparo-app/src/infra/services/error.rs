use thiserror::Error;

/// Failure reported by the hosted provider or while talking to it.
///
/// `Display` is the user-facing text: provider messages are surfaced verbatim.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// The provider rejected the request (bad credentials, duplicate account,
    /// expired link, row-level security, ...).
    #[error("{message}")]
    Rejected {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("{0}")]
    Network(String),

    #[error("Resposta inesperada do servidor: {0}")]
    Decode(String),

    #[error("Nenhuma sessão ativa")]
    NoSession,

    #[error("Falha ao salvar a sessão: {0}")]
    Storage(String),
}

impl ProviderError {
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        ProviderError::Rejected {
            status,
            code: None,
            message: message.into(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the credentials or refresh token themselves are no longer
    /// accepted, as opposed to a transient failure.
    pub fn is_auth_rejection(&self) -> bool {
        matches!(self.status(), Some(400 | 401 | 403))
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;
