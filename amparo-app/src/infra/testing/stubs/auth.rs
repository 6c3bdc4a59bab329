use std::collections::HashMap;
use std::sync::Arc;

use amparo_model::{AuthUser, Session, SessionChange, SignUpOutcome, UserId};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use parking_lot::RwLock;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::infra::services::{
    AuthProvider, Credentials, ProviderError, ProviderResult, ResetPasswordOptions,
    SessionSubscription,
};

/// A session for `user` valid for one hour.
pub fn issue_session(user: &AuthUser) -> Session {
    Session {
        access_token: format!("stub-access-{}", Uuid::now_v7()),
        refresh_token: format!("stub-refresh-{}", Uuid::now_v7()),
        token_type: "bearer".into(),
        expires_in: 3600,
        expires_at: Some(Utc::now() + Duration::hours(1)),
        user: user.clone(),
    }
}

/// How often each operation was called.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthCalls {
    pub sign_in: usize,
    pub sign_up: usize,
    pub reset_password: usize,
    pub sign_out: usize,
    pub get_session: usize,
    pub subscribe: usize,
    pub start_auto_refresh: usize,
    pub stop_auto_refresh: usize,
}

#[derive(Debug, Default)]
struct InnerAuthState {
    /// email -> (password, user)
    accounts: HashMap<String, (String, AuthUser)>,
    session: Option<Session>,
    /// Sign-up returns a live session instead of waiting for confirmation.
    auto_confirm: bool,
    sign_in_error: Option<ProviderError>,
    sign_up_error: Option<ProviderError>,
    reset_error: Option<ProviderError>,
    sign_out_error: Option<ProviderError>,
    get_session_error: Option<ProviderError>,
    reset_requests: Vec<(String, String)>,
    auto_refresh_running: bool,
    calls: AuthCalls,
}

/// In-memory [`AuthProvider`] with scripted failures and a real change
/// stream.
#[derive(Debug, Clone)]
pub struct StubAuthProvider {
    inner: Arc<RwLock<InnerAuthState>>,
    changes: broadcast::Sender<SessionChange>,
}

impl Default for StubAuthProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl StubAuthProvider {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(16);
        Self {
            inner: Arc::new(RwLock::new(InnerAuthState::default())),
            changes,
        }
    }

    /// Register an account that can sign in.
    pub fn with_account(self, email: &str, password: &str) -> Self {
        self.register(email, password);
        self
    }

    /// Start with a persisted session for `email`, as after a restart.
    pub fn with_persisted_session(self, email: &str, password: &str) -> Self {
        let user = self.register(email, password);
        self.inner.write().session = Some(issue_session(&user));
        self
    }

    pub fn with_auto_confirm(self, auto_confirm: bool) -> Self {
        self.inner.write().auto_confirm = auto_confirm;
        self
    }

    pub fn register(&self, email: &str, password: &str) -> AuthUser {
        let user = AuthUser {
            id: UserId(Uuid::new_v4()),
            email: Some(email.to_string()),
        };
        self.inner
            .write()
            .accounts
            .insert(email.to_string(), (password.to_string(), user.clone()));
        user
    }

    pub fn user(&self, email: &str) -> Option<AuthUser> {
        self.inner
            .read()
            .accounts
            .get(email)
            .map(|(_, user)| user.clone())
    }

    pub fn fail_sign_in(&self, error: Option<ProviderError>) {
        self.inner.write().sign_in_error = error;
    }

    pub fn fail_sign_up(&self, error: Option<ProviderError>) {
        self.inner.write().sign_up_error = error;
    }

    pub fn fail_reset_password(&self, error: Option<ProviderError>) {
        self.inner.write().reset_error = error;
    }

    pub fn fail_sign_out(&self, error: Option<ProviderError>) {
        self.inner.write().sign_out_error = error;
    }

    pub fn fail_get_session(&self, error: Option<ProviderError>) {
        self.inner.write().get_session_error = error;
    }

    pub fn calls(&self) -> AuthCalls {
        self.inner.read().calls
    }

    pub fn session(&self) -> Option<Session> {
        self.inner.read().session.clone()
    }

    /// `(email, redirect_to)` of every reset request.
    pub fn reset_requests(&self) -> Vec<(String, String)> {
        self.inner.read().reset_requests.clone()
    }

    pub fn auto_refresh_running(&self) -> bool {
        self.inner.read().auto_refresh_running
    }

    /// Push a change to subscribers, as the provider would on its own (token
    /// refresh, sign-out from another device).
    pub fn emit(&self, change: SessionChange) {
        self.inner.write().session = change.session.clone();
        if self.changes.send(change).is_err() {
            log::trace!("[Stub] No session subscribers");
        }
    }
}

#[async_trait]
impl AuthProvider for StubAuthProvider {
    async fn sign_in(&self, credentials: Credentials) -> ProviderResult<Session> {
        let session = {
            let mut inner = self.inner.write();
            inner.calls.sign_in += 1;
            if let Some(err) = inner.sign_in_error.clone() {
                return Err(err);
            }
            let user = match inner.accounts.get(&credentials.email) {
                Some((password, user)) if password == credentials.password.as_str() => {
                    user.clone()
                }
                _ => return Err(ProviderError::rejected(400, "Invalid login credentials")),
            };
            issue_session(&user)
        };
        self.emit(SessionChange::signed_in(session.clone()));
        Ok(session)
    }

    async fn sign_up(&self, credentials: Credentials) -> ProviderResult<SignUpOutcome> {
        let outcome = {
            let mut inner = self.inner.write();
            inner.calls.sign_up += 1;
            if let Some(err) = inner.sign_up_error.clone() {
                return Err(err);
            }
            if inner.accounts.contains_key(&credentials.email) {
                // Existing addresses are not disclosed.
                return Ok(SignUpOutcome::default());
            }
            let user = AuthUser {
                id: UserId(Uuid::new_v4()),
                email: Some(credentials.email.clone()),
            };
            inner.accounts.insert(
                credentials.email.clone(),
                (credentials.password.as_str().to_string(), user.clone()),
            );
            SignUpOutcome {
                session: inner.auto_confirm.then(|| issue_session(&user)),
                user: Some(user),
            }
        };
        if let Some(session) = &outcome.session {
            self.emit(SessionChange::signed_in(session.clone()));
        }
        Ok(outcome)
    }

    async fn reset_password(
        &self,
        email: String,
        options: ResetPasswordOptions,
    ) -> ProviderResult<()> {
        let mut inner = self.inner.write();
        inner.calls.reset_password += 1;
        if let Some(err) = inner.reset_error.clone() {
            return Err(err);
        }
        inner.reset_requests.push((email, options.redirect_to));
        Ok(())
    }

    async fn sign_out(&self) -> ProviderResult<()> {
        {
            let mut inner = self.inner.write();
            inner.calls.sign_out += 1;
            if let Some(err) = inner.sign_out_error.clone() {
                return Err(err);
            }
        }
        self.emit(SessionChange::signed_out());
        Ok(())
    }

    async fn get_session(&self) -> ProviderResult<Option<Session>> {
        let mut inner = self.inner.write();
        inner.calls.get_session += 1;
        match inner.get_session_error.clone() {
            Some(err) => Err(err),
            None => Ok(inner.session.clone()),
        }
    }

    fn subscribe(&self) -> SessionSubscription {
        self.inner.write().calls.subscribe += 1;
        SessionSubscription::new(self.changes.subscribe())
    }

    fn start_auto_refresh(&self) {
        let mut inner = self.inner.write();
        inner.calls.start_auto_refresh += 1;
        inner.auto_refresh_running = true;
    }

    fn stop_auto_refresh(&self) {
        let mut inner = self.inner.write();
        inner.calls.stop_auto_refresh += 1;
        inner.auto_refresh_running = false;
    }
}
