//! Authentication session as reported by the hosted auth provider.

use chrono::{DateTime, Duration, Utc};

use crate::ids::UserId;

/// The identity half of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AuthUser {
    pub id: UserId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub email: Option<String>,
}

/// An authenticated session.
///
/// Issued and refreshed by the provider only. The app observes it through the
/// provider's session query and change stream and never derives one itself.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    #[cfg_attr(feature = "serde", serde(default = "default_token_type"))]
    pub token_type: String,
    /// Lifetime of the access token in seconds, as issued.
    #[cfg_attr(feature = "serde", serde(default))]
    pub expires_in: i64,
    #[cfg_attr(
        feature = "serde",
        serde(default, with = "chrono::serde::ts_seconds_option")
    )]
    pub expires_at: Option<DateTime<Utc>>,
    pub user: AuthUser,
}

#[cfg(feature = "serde")]
fn default_token_type() -> String {
    "bearer".to_string()
}

impl Session {
    pub fn user_id(&self) -> UserId {
        self.user.id
    }

    pub fn email(&self) -> Option<&str> {
        self.user.email.as_deref()
    }

    /// Absolute expiry, falling back to `issued_at + expires_in` when the
    /// provider did not send one.
    pub fn expiry(&self, issued_at: DateTime<Utc>) -> DateTime<Utc> {
        self.expires_at
            .unwrap_or_else(|| issued_at + Duration::seconds(self.expires_in))
    }

    /// Sessions without an absolute expiry are treated as live.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expiry| expiry <= now)
    }

    /// True when the access token expires within `margin` of `now`.
    pub fn expires_within(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        self.expires_at.is_some_and(|expiry| expiry - margin <= now)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("expires_at", &self.expires_at)
            .field("user", &self.user)
            .finish()
    }
}

/// Kind of session transition emitted by the provider's change stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum AuthChangeEvent {
    InitialSession,
    SignedIn,
    SignedOut,
    TokenRefreshed,
    UserUpdated,
    PasswordRecovery,
}

impl AuthChangeEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthChangeEvent::InitialSession => "INITIAL_SESSION",
            AuthChangeEvent::SignedIn => "SIGNED_IN",
            AuthChangeEvent::SignedOut => "SIGNED_OUT",
            AuthChangeEvent::TokenRefreshed => "TOKEN_REFRESHED",
            AuthChangeEvent::UserUpdated => "USER_UPDATED",
            AuthChangeEvent::PasswordRecovery => "PASSWORD_RECOVERY",
        }
    }
}

impl std::fmt::Display for AuthChangeEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the provider's session change stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionChange {
    pub event: AuthChangeEvent,
    pub session: Option<Session>,
}

impl SessionChange {
    pub fn new(event: AuthChangeEvent, session: Option<Session>) -> Self {
        Self { event, session }
    }

    pub fn signed_in(session: Session) -> Self {
        Self::new(AuthChangeEvent::SignedIn, Some(session))
    }

    pub fn signed_out() -> Self {
        Self::new(AuthChangeEvent::SignedOut, None)
    }
}

/// Result of creating an identity.
///
/// `user` is absent when the provider withholds it (e.g. pending email
/// confirmation on an existing address). `session` is only present when the
/// provider signs the new user in immediately.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpOutcome {
    pub user: Option<AuthUser>,
    pub session: Option<Session>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn session_expiring_at(expires_at: Option<DateTime<Utc>>) -> Session {
        Session {
            access_token: "access-secret".into(),
            refresh_token: "refresh-secret".into(),
            token_type: "bearer".into(),
            expires_in: 3600,
            expires_at,
            user: AuthUser {
                id: UserId(Uuid::nil()),
                email: Some("ana@example.com".into()),
            },
        }
    }

    #[test]
    fn debug_output_redacts_tokens() {
        let session = session_expiring_at(None);
        let rendered = format!("{session:?}");
        assert!(!rendered.contains("access-secret"));
        assert!(!rendered.contains("refresh-secret"));
        assert!(rendered.contains("ana@example.com"));
    }

    #[test]
    fn expiry_checks_respect_margin() {
        let now = Utc::now();
        let session = session_expiring_at(Some(now + Duration::seconds(30)));
        assert!(!session.is_expired_at(now));
        assert!(session.expires_within(now, Duration::seconds(60)));
        assert!(!session.expires_within(now, Duration::seconds(10)));
        assert!(session.is_expired_at(now + Duration::seconds(31)));
    }

    #[test]
    fn session_without_expiry_never_expires() {
        let session = session_expiring_at(None);
        assert!(!session.is_expired_at(Utc::now() + Duration::days(365)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserializes_provider_payload() {
        let raw = r#"{
            "access_token": "a",
            "refresh_token": "r",
            "token_type": "bearer",
            "expires_in": 3600,
            "expires_at": 1700000000,
            "user": { "id": "6f1c2a8e-4a4b-4c57-9d2e-0b7f3c1e2a90", "email": "ana@example.com", "role": "authenticated" }
        }"#;
        let session: Session = serde_json::from_str(raw).expect("session json");
        assert_eq!(session.email(), Some("ana@example.com"));
        assert_eq!(
            session.expires_at.map(|at| at.timestamp()),
            Some(1_700_000_000)
        );
    }
}
