use std::sync::{Arc, Weak};
use std::time::Duration;

use amparo_config::Config;
use amparo_config::constants::{DEFAULT_REFRESH_MARGIN, DEFAULT_REQUEST_TIMEOUT};
use amparo_model::{AuthChangeEvent, AuthUser, Session, SessionChange, SignUpOutcome};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tokio::sync::{OnceCell, broadcast};
use tokio::task::JoinHandle;
use url::Url;

use crate::infra::services::{
    AuthProvider, Credentials, ProviderError, ProviderResult, ResetPasswordOptions,
    SessionSubscription,
};

use super::error;
use super::refresh;
use super::storage::SessionStorage;

const CHANGE_CHANNEL_CAPACITY: usize = 16;

/// Tuning knobs that do not come from the endpoint itself.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub request_timeout: Duration,
    /// Refresh the access token this long before it expires.
    pub refresh_margin: Duration,
    /// Where to persist the session; `None` keeps it in memory only.
    pub storage: Option<SessionStorage>,
    pub auto_refresh_tick: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            refresh_margin: DEFAULT_REFRESH_MARGIN,
            storage: None,
            auto_refresh_tick: refresh::DEFAULT_TICK,
        }
    }
}

pub(super) struct Inner {
    pub(super) http: Client,
    base_url: Url,
    anon_key: String,
    session: RwLock<Option<Session>>,
    changes: broadcast::Sender<SessionChange>,
    storage: Option<SessionStorage>,
    restored: OnceCell<()>,
    refresh_margin: chrono::Duration,
    auto_refresh_tick: Duration,
    refresher: Mutex<Option<JoinHandle<()>>>,
}

/// Client for a Supabase project.
///
/// Cheap to clone; clones share the session and the change channel.
#[derive(Clone)]
pub struct SupabaseClient {
    pub(super) inner: Arc<Inner>,
}

impl std::fmt::Debug for SupabaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("anon_key", &"[REDACTED]")
            .field("has_session", &self.inner.session.read().is_some())
            .field("persists_session", &self.inner.storage.is_some())
            .finish()
    }
}

impl SupabaseClient {
    pub fn new(
        base_url: Url,
        anon_key: impl Into<String>,
        options: ClientOptions,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(options.request_timeout).build()?;

        let mut base_url = base_url;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let refresh_margin = chrono::Duration::from_std(options.refresh_margin)
            .unwrap_or_else(|_| chrono::Duration::seconds(60));
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);

        log::info!("[Supabase] Client for {base_url}");
        Ok(Self {
            inner: Arc::new(Inner {
                http,
                base_url,
                anon_key: anon_key.into(),
                session: RwLock::new(None),
                changes,
                storage: options.storage,
                restored: OnceCell::new(),
                refresh_margin,
                auto_refresh_tick: options.auto_refresh_tick,
                refresher: Mutex::new(None),
            }),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let storage = config
            .auth
            .persist_session
            .then(|| SessionStorage::new(config.session_file()));
        Self::new(
            config.supabase.url.clone(),
            config.supabase.anon_key.clone(),
            ClientOptions {
                request_timeout: config.supabase.request_timeout,
                refresh_margin: config.auth.refresh_margin,
                storage,
                ..ClientOptions::default()
            },
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Session held in memory, without restoring or refreshing.
    pub fn current_session(&self) -> Option<Session> {
        self.inner.session.read().clone()
    }

    pub(super) fn downgrade(&self) -> Weak<Inner> {
        Arc::downgrade(&self.inner)
    }

    pub(super) fn from_inner(inner: Arc<Inner>) -> Self {
        Self { inner }
    }

    pub(super) fn endpoint(&self, path: &str) -> ProviderResult<Url> {
        self.inner
            .base_url
            .join(path)
            .map_err(|err| ProviderError::Network(format!("invalid endpoint {path}: {err}")))
    }

    /// `apikey` plus the user's bearer token, or the anon key when signed
    /// out.
    pub(super) fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let bearer = self
            .inner
            .session
            .read()
            .as_ref()
            .map(|session| session.access_token.clone())
            .unwrap_or_else(|| self.inner.anon_key.clone());
        request
            .header("apikey", &self.inner.anon_key)
            .bearer_auth(bearer)
    }

    pub(super) async fn send(&self, request: RequestBuilder) -> ProviderResult<Response> {
        let response = request.send().await.map_err(error::network)?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(error::from_response(response).await)
        }
    }

    pub(super) async fn json<T: DeserializeOwned>(response: Response) -> ProviderResult<T> {
        response.json().await.map_err(error::decode)
    }

    async fn token_grant(&self, grant_type: &str, body: Value) -> ProviderResult<Session> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", grant_type);
        let request = self
            .inner
            .http
            .post(url)
            .header("apikey", &self.inner.anon_key)
            .bearer_auth(&self.inner.anon_key)
            .json(&body);
        let response = self.send(request).await?;
        let session: Session = Self::json(response).await?;
        Ok(with_absolute_expiry(session))
    }

    async fn store_session(&self, session: Session, event: AuthChangeEvent) {
        *self.inner.session.write() = Some(session.clone());
        if let Some(storage) = &self.inner.storage
            && let Err(err) = storage.save(&session).await
        {
            log::warn!("[Supabase] Could not persist session: {err}");
        }
        self.emit(SessionChange::new(event, Some(session)));
    }

    pub(super) async fn clear_session(&self) {
        let had_session = self.inner.session.write().take().is_some();
        if let Some(storage) = &self.inner.storage
            && let Err(err) = storage.clear().await
        {
            log::warn!("[Supabase] Could not remove persisted session: {err}");
        }
        if had_session {
            self.emit(SessionChange::signed_out());
        }
    }

    fn emit(&self, change: SessionChange) {
        log::debug!("[Supabase] Emitting {}", change.event);
        if self.inner.changes.send(change).is_err() {
            log::trace!("[Supabase] No session subscribers");
        }
    }

    /// Load the persisted session into memory. Runs at most once.
    async fn restore(&self) {
        self.inner
            .restored
            .get_or_init(|| async {
                let Some(storage) = &self.inner.storage else {
                    return;
                };
                match storage.load().await {
                    Ok(Some(session)) => {
                        log::debug!("[Supabase] Restored session of {}", session.user_id());
                        let mut current = self.inner.session.write();
                        if current.is_none() {
                            *current = Some(session);
                        }
                    }
                    Ok(None) => {}
                    Err(err) => {
                        log::warn!("[Supabase] Discarding unreadable session file: {err}");
                        if let Err(err) = storage.clear().await {
                            log::warn!("[Supabase] {err}");
                        }
                    }
                }
            })
            .await;
    }

    /// Exchange the refresh token for a new session and emit
    /// `TOKEN_REFRESHED`.
    pub async fn refresh_session(&self) -> ProviderResult<Session> {
        let refresh_token = self
            .current_session()
            .map(|session| session.refresh_token)
            .ok_or(ProviderError::NoSession)?;
        let session = self
            .token_grant("refresh_token", json!({ "refresh_token": refresh_token }))
            .await?;
        log::debug!("[Supabase] Refreshed access token of {}", session.user_id());
        self.store_session(session.clone(), AuthChangeEvent::TokenRefreshed)
            .await;
        Ok(session)
    }

    /// Refresh if the token expires within the margin. A rejected refresh
    /// token ends the session.
    pub(super) async fn refresh_if_due(&self) -> ProviderResult<Option<Session>> {
        let Some(session) = self.current_session() else {
            return Ok(None);
        };
        if !session.expires_within(Utc::now(), self.inner.refresh_margin) {
            return Ok(Some(session));
        }
        match self.refresh_session().await {
            Ok(session) => Ok(Some(session)),
            Err(err) if err.is_auth_rejection() => {
                log::warn!("[Supabase] Refresh token rejected, signing out: {err}");
                self.clear_session().await;
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}

/// Fill `expires_at` from `expires_in` when the provider left it out.
fn with_absolute_expiry(mut session: Session) -> Session {
    if session.expires_at.is_none() && session.expires_in > 0 {
        session.expires_at = Some(session.expiry(Utc::now()));
    }
    session
}

/// Signup answers with a session when no confirmation is required and with
/// the bare user otherwise. An existing address comes back as a user without
/// identities, which counts as withheld.
pub(super) fn parse_sign_up(value: Value) -> ProviderResult<SignUpOutcome> {
    if value.get("access_token").is_some_and(|token| !token.is_null()) {
        let session: Session = serde_json::from_value(value).map_err(error::decode)?;
        let session = with_absolute_expiry(session);
        return Ok(SignUpOutcome {
            user: Some(session.user.clone()),
            session: Some(session),
        });
    }

    let user = match value.get("user") {
        Some(user) if !user.is_null() => user.clone(),
        _ => value,
    };
    if user.get("id").is_none_or(Value::is_null) {
        return Ok(SignUpOutcome::default());
    }
    let withheld = user
        .get("identities")
        .and_then(Value::as_array)
        .is_some_and(Vec::is_empty);
    if withheld {
        return Ok(SignUpOutcome::default());
    }
    let user: AuthUser = serde_json::from_value(user).map_err(error::decode)?;
    Ok(SignUpOutcome {
        user: Some(user),
        session: None,
    })
}

#[async_trait]
impl AuthProvider for SupabaseClient {
    async fn sign_in(&self, credentials: Credentials) -> ProviderResult<Session> {
        let session = self
            .token_grant(
                "password",
                json!({
                    "email": credentials.email,
                    "password": credentials.password.as_str(),
                }),
            )
            .await?;
        log::info!("[Supabase] Signed in {}", session.user_id());
        self.store_session(session.clone(), AuthChangeEvent::SignedIn)
            .await;
        Ok(session)
    }

    async fn sign_up(&self, credentials: Credentials) -> ProviderResult<SignUpOutcome> {
        let url = self.endpoint("auth/v1/signup")?;
        let request = self
            .inner
            .http
            .post(url)
            .header("apikey", &self.inner.anon_key)
            .bearer_auth(&self.inner.anon_key)
            .json(&json!({
                "email": credentials.email,
                "password": credentials.password.as_str(),
            }));
        let response = self.send(request).await?;
        let outcome = parse_sign_up(Self::json(response).await?)?;
        if let Some(session) = &outcome.session {
            self.store_session(session.clone(), AuthChangeEvent::SignedIn)
                .await;
        }
        Ok(outcome)
    }

    async fn reset_password(
        &self,
        email: String,
        options: ResetPasswordOptions,
    ) -> ProviderResult<()> {
        let mut url = self.endpoint("auth/v1/recover")?;
        url.query_pairs_mut()
            .append_pair("redirect_to", &options.redirect_to);
        let request = self
            .inner
            .http
            .post(url)
            .header("apikey", &self.inner.anon_key)
            .bearer_auth(&self.inner.anon_key)
            .json(&json!({ "email": email }));
        self.send(request).await?;
        Ok(())
    }

    /// Revoke the session remotely, then forget it locally.
    ///
    /// A token the provider no longer knows counts as signed out.
    async fn sign_out(&self) -> ProviderResult<()> {
        if self.current_session().is_some() {
            let url = self.endpoint("auth/v1/logout")?;
            let request = self.authorize(self.inner.http.post(url));
            match self.send(request).await {
                Ok(_) => {}
                Err(err) if matches!(err.status(), Some(401 | 403 | 404)) => {
                    log::debug!("[Supabase] Session already invalid on sign-out: {err}");
                }
                Err(err) => return Err(err),
            }
        }
        self.clear_session().await;
        log::info!("[Supabase] Signed out");
        Ok(())
    }

    async fn get_session(&self) -> ProviderResult<Option<Session>> {
        self.restore().await;
        self.refresh_if_due().await
    }

    fn subscribe(&self) -> SessionSubscription {
        SessionSubscription::new(self.inner.changes.subscribe())
    }

    fn start_auto_refresh(&self) {
        let mut refresher = self.inner.refresher.lock();
        if refresher.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return;
        }
        match refresh::spawn(self.downgrade(), self.inner.auto_refresh_tick) {
            Some(handle) => {
                log::debug!("[Supabase] Auto-refresh started");
                *refresher = Some(handle);
            }
            None => log::warn!("[Supabase] Auto-refresh needs a tokio runtime"),
        }
    }

    fn stop_auto_refresh(&self) {
        if let Some(handle) = self.inner.refresher.lock().take() {
            handle.abort();
            log::debug!("[Supabase] Auto-refresh stopped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_up_with_session_signs_in() {
        let outcome = parse_sign_up(json!({
            "access_token": "a",
            "refresh_token": "r",
            "token_type": "bearer",
            "expires_in": 3600,
            "user": { "id": "6f1c2a8e-4a4b-4c57-9d2e-0b7f3c1e2a90", "email": "ana@example.com" }
        }))
        .expect("outcome");
        assert!(outcome.session.is_some_and(|s| s.expires_at.is_some()));
        assert_eq!(
            outcome.user.and_then(|user| user.email).as_deref(),
            Some("ana@example.com")
        );
    }

    #[test]
    fn sign_up_pending_confirmation_returns_user() {
        let outcome = parse_sign_up(json!({
            "id": "6f1c2a8e-4a4b-4c57-9d2e-0b7f3c1e2a90",
            "email": "ana@example.com",
            "identities": [{ "provider": "email" }]
        }))
        .expect("outcome");
        assert!(outcome.user.is_some());
        assert!(outcome.session.is_none());
    }

    #[test]
    fn sign_up_existing_address_is_withheld() {
        let outcome = parse_sign_up(json!({
            "id": "6f1c2a8e-4a4b-4c57-9d2e-0b7f3c1e2a90",
            "email": "ana@example.com",
            "identities": []
        }))
        .expect("outcome");
        assert_eq!(outcome, SignUpOutcome::default());
    }
}
