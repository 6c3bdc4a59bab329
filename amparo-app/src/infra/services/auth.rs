//! Authentication provider contract.
//!
//! The hosted provider is the authority for identity, token issuance, refresh
//! and storage. The app only calls these operations and observes the session
//! change stream. For in-memory doubles see
//! `infra::testing::stubs::StubAuthProvider`.

use amparo_model::{Session, SessionChange, SignUpOutcome};
use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::domains::auth::security::SecureCredential;

use super::error::ProviderResult;

/// Email and password pair handed to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: SecureCredential,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: SecureCredential) -> Self {
        Self {
            email: email.into(),
            password,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetPasswordOptions {
    /// Deep link embedded in the reset email.
    pub redirect_to: String,
}

/// Outcome of polling a [`SessionSubscription`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionEvent {
    Change(SessionChange),
    /// The receiver fell behind and `u64` changes were dropped.
    Lagged(u64),
    Closed,
}

/// Live handle on the provider's session change stream.
///
/// Dropping it releases the subscription.
#[derive(Debug)]
pub struct SessionSubscription {
    receiver: broadcast::Receiver<SessionChange>,
}

impl SessionSubscription {
    pub fn new(receiver: broadcast::Receiver<SessionChange>) -> Self {
        Self { receiver }
    }

    /// Next already-delivered event, without waiting.
    pub fn try_next(&mut self) -> Option<SubscriptionEvent> {
        use broadcast::error::TryRecvError;
        match self.receiver.try_recv() {
            Ok(change) => Some(SubscriptionEvent::Change(change)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Lagged(missed)) => {
                Some(SubscriptionEvent::Lagged(missed))
            }
            Err(TryRecvError::Closed) => Some(SubscriptionEvent::Closed),
        }
    }

    pub async fn next(&mut self) -> SubscriptionEvent {
        use broadcast::error::RecvError;
        match self.receiver.recv().await {
            Ok(change) => SubscriptionEvent::Change(change),
            Err(RecvError::Lagged(missed)) => SubscriptionEvent::Lagged(missed),
            Err(RecvError::Closed) => SubscriptionEvent::Closed,
        }
    }
}

/// Hosted authentication provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Password sign-in. On success the provider also emits `SIGNED_IN`.
    async fn sign_in(&self, credentials: Credentials) -> ProviderResult<Session>;

    /// Create an identity. The provider may withhold the user (pending
    /// confirmation) or sign it in immediately.
    async fn sign_up(
        &self,
        credentials: Credentials,
    ) -> ProviderResult<SignUpOutcome>;

    /// Send a password reset email.
    async fn reset_password(
        &self,
        email: String,
        options: ResetPasswordOptions,
    ) -> ProviderResult<()>;

    async fn sign_out(&self) -> ProviderResult<()>;

    /// Current session, restoring a persisted one if available.
    async fn get_session(&self) -> ProviderResult<Option<Session>>;

    /// Subscribe to session changes.
    fn subscribe(&self) -> SessionSubscription;

    /// Keep the access token fresh in the background.
    fn start_auto_refresh(&self);

    fn stop_auto_refresh(&self);
}
