//! Shared harness for the app-level tests: an [`App`] wired to the in-memory
//! stubs, booted until the session has resolved.
#![allow(dead_code)]

use std::sync::Arc;

use amparo_app::app::{App, AppConfig};
use amparo_app::domains::auth::{AuthField, AuthMessage, AuthUiState};
use amparo_app::domains::navigation::Route;
use amparo_app::domains::profile::SettingsScreen;
use amparo_app::infra::services::{AuthProvider, ProfileRepository, Services};
use amparo_app::infra::testing::{StubAuthProvider, StubProfileRepository};
use amparo_app::state::AppSettings;
use amparo_model::{Profile, UserId};

pub const EMAIL: &str = "ana@example.com";
pub const PASSWORD: &str = "secret1";

pub struct Harness {
    pub app: App,
    pub auth: StubAuthProvider,
    pub profiles: StubProfileRepository,
}

impl Harness {
    pub async fn boot(auth: StubAuthProvider, profiles: StubProfileRepository) -> Self {
        Self::boot_with(auth, profiles, AppSettings::default()).await
    }

    pub async fn boot_with(
        auth: StubAuthProvider,
        profiles: StubProfileRepository,
        settings: AppSettings,
    ) -> Self {
        let services = Services::new(
            Arc::new(auth.clone()) as Arc<dyn AuthProvider>,
            Arc::new(profiles.clone()) as Arc<dyn ProfileRepository>,
        );
        let mut app = App::boot(AppConfig::with_services(services, settings));
        app.run_until_idle().await;
        Self {
            app,
            auth,
            profiles,
        }
    }

    /// Signed out, on the login screen, with one registered account.
    pub async fn signed_out() -> Self {
        Self::boot(
            StubAuthProvider::new().with_account(EMAIL, PASSWORD),
            StubProfileRepository::new(),
        )
        .await
    }

    /// Restored session for [`EMAIL`] with a profile row named Ana Silva.
    pub async fn signed_in() -> Self {
        let auth = StubAuthProvider::new().with_persisted_session(EMAIL, PASSWORD);
        let user = auth.user(EMAIL).expect("registered user").id;
        let profiles = StubProfileRepository::new().with_profile(profile(user));
        Self::boot(auth, profiles).await
    }

    pub fn route(&self) -> Route {
        self.app.state().current_route()
    }

    pub fn auth_ui(&self) -> &AuthUiState {
        self.app
            .state()
            .domains
            .auth
            .ui
            .as_ref()
            .expect("auth screen mounted")
    }

    pub fn settings(&self) -> &SettingsScreen {
        self.app
            .state()
            .domains
            .profile
            .settings
            .as_ref()
            .expect("settings screen mounted")
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.app.state().domains.session.store.user_id()
    }

    pub fn fill(&mut self, fields: &[(AuthField, &str)]) {
        for (field, value) in fields {
            self.app
                .dispatch(AuthMessage::UpdateField(*field, (*value).to_string()));
        }
    }

    pub fn fill_sign_up(&mut self) {
        self.app.dispatch(AuthMessage::ShowSignUp);
        self.fill(&[
            (AuthField::FirstName, " Maria "),
            (AuthField::LastName, "Souza"),
            (AuthField::Email, "maria@example.com"),
            (AuthField::Password, "secret2"),
        ]);
    }

    pub async fn submit(&mut self) {
        self.app.dispatch(AuthMessage::Submit);
        self.app.run_until_idle().await;
    }
}

pub fn profile(id: UserId) -> Profile {
    Profile {
        name: Some("Ana".into()),
        last_name: Some("Silva".into()),
        phone_number: Some("(11) 91234-5678".into()),
        ..Profile::empty(id)
    }
}
