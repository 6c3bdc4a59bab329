//! Sign-in, sign-up and password reset driven through the app runtime.

mod common;

use amparo_app::common::AlertKind;
use amparo_app::domains::auth::{AuthField, AuthMessage, AuthMode};
use amparo_app::domains::navigation::{NavigationMessage, Route};
use amparo_app::domains::profile::ProfileMessage;
use amparo_app::infra::services::ProviderError;
use amparo_app::infra::testing::{StubAuthProvider, StubProfileRepository};
use common::{EMAIL, Harness, PASSWORD};

#[tokio::test]
async fn boot_without_session_lands_on_login() {
    let h = Harness::signed_out().await;
    assert_eq!(h.route(), Route::Login);
    assert_eq!(h.auth_ui().mode, AuthMode::SignIn);
    assert_eq!(h.auth.calls().subscribe, 1);
    assert_eq!(h.auth.calls().get_session, 1);
}

#[tokio::test]
async fn empty_password_sign_in_never_reaches_provider() {
    let mut h = Harness::signed_out().await;
    h.fill(&[(AuthField::Email, EMAIL), (AuthField::Password, "   ")]);
    h.submit().await;

    assert_eq!(h.auth.calls().sign_in, 0);
    let ui = h.auth_ui();
    let alert = ui.alert.as_ref().expect("validation alert");
    assert_eq!(alert.title, "Erro");
    assert_eq!(alert.message, "Por favor, preencha todos os campos");
    assert!(!ui.is_submitting);
    assert_eq!(h.route(), Route::Login);
}

#[tokio::test]
async fn sign_in_success_routes_home_and_loads_profile() {
    let mut h = Harness::signed_out().await;
    h.fill(&[(AuthField::Email, EMAIL), (AuthField::Password, PASSWORD)]);
    h.submit().await;

    assert_eq!(h.auth.calls().sign_in, 1);
    assert_eq!(h.route(), Route::Home);
    assert_eq!(h.app.state().domains.navigation.router.stack(), &[Route::Home]);
    assert!(h.app.state().domains.auth.ui.is_none());
    assert_eq!(h.user_id(), h.auth.user(EMAIL).map(|user| user.id));
    assert_eq!(h.profiles.calls().fetch, 1);
}

#[tokio::test]
async fn sign_in_rejection_shows_provider_message() {
    let mut h = Harness::signed_out().await;
    h.fill(&[(AuthField::Email, EMAIL), (AuthField::Password, "wrong")]);
    h.submit().await;

    let ui = h.auth_ui();
    let alert = ui.alert.as_ref().expect("failure alert");
    assert_eq!(alert.title, "Erro de Login");
    assert_eq!(alert.message, "Invalid login credentials");
    assert!(!ui.is_submitting);
    assert_eq!(ui.mode, AuthMode::SignIn);
    assert_eq!(h.route(), Route::Login);
}

#[tokio::test]
async fn double_submit_issues_one_provider_call() {
    let mut h = Harness::signed_out().await;
    h.fill(&[(AuthField::Email, EMAIL), (AuthField::Password, "wrong")]);
    h.app.dispatch(AuthMessage::Submit);
    assert!(h.auth_ui().is_submitting);
    h.app.dispatch(AuthMessage::Submit);
    h.app.run_until_idle().await;

    assert_eq!(h.auth.calls().sign_in, 1);
    assert!(!h.auth_ui().is_submitting);
}

#[tokio::test]
async fn completion_for_replaced_screen_is_dropped() {
    let mut h = Harness::signed_out().await;
    h.auth.fail_sign_in(Some(ProviderError::rejected(400, "Invalid login credentials")));
    h.fill(&[(AuthField::Email, EMAIL), (AuthField::Password, PASSWORD)]);
    h.app.dispatch(AuthMessage::Submit);
    let first = h.auth_ui().screen;

    // Leaving and re-entering login mounts a fresh screen.
    h.app.dispatch(NavigationMessage::Push(Route::Modal));
    let second = h.auth_ui().screen;
    assert_ne!(first, second);
    assert_eq!(h.route(), Route::Login);

    h.app.run_until_idle().await;
    let ui = h.auth_ui();
    assert_eq!(ui.screen, second);
    assert!(ui.alert.is_none());
    assert!(!ui.is_submitting);
    assert!(ui.form.is_empty());
}

#[tokio::test]
async fn sign_up_success_then_acknowledge_resets_to_sign_in() {
    let mut h = Harness::signed_out().await;
    h.fill_sign_up();
    h.submit().await;

    let user = h.auth.user("maria@example.com").expect("identity created");
    let row = h.profiles.profile(user.id).expect("profile row");
    assert_eq!(row.name.as_deref(), Some("Maria"));
    assert_eq!(row.last_name.as_deref(), Some("Souza"));
    assert_eq!(row.phone_number, None);

    let ui = h.auth_ui();
    let alert = ui.alert.as_ref().expect("success alert");
    assert_eq!(alert.kind, AlertKind::Success);
    assert_eq!(alert.title, "Conta Criada!");
    assert_eq!(ui.mode, AuthMode::SignUp);

    h.app.dispatch(AuthMessage::AcknowledgeAlert);
    let ui = h.auth_ui();
    assert_eq!(ui.mode, AuthMode::SignIn);
    assert!(ui.form.is_empty());
    assert!(ui.alert.is_none());
}

#[tokio::test]
async fn sign_up_profile_failure_keeps_fields_and_identity() {
    let mut h = Harness::signed_out().await;
    h.profiles
        .fail_upsert(Some(ProviderError::rejected(403, "permission denied")));
    h.fill_sign_up();
    h.submit().await;

    assert!(h.auth.user("maria@example.com").is_some());
    let ui = h.auth_ui();
    let alert = ui.alert.as_ref().expect("failure alert");
    assert_eq!(alert.message, "Falha ao criar perfil: permission denied");
    assert_eq!(ui.mode, AuthMode::SignUp);
    assert_eq!(ui.form.first_name, " Maria ");
    assert_eq!(ui.form.email, "maria@example.com");
    assert_eq!(ui.form.password.as_str(), "secret2");
    assert!(!ui.is_submitting);
}

#[tokio::test]
async fn sign_up_identity_failure_skips_profile() {
    let mut h = Harness::signed_out().await;
    h.auth.fail_sign_up(Some(ProviderError::rejected(
        422,
        "Password should be at least 6 characters",
    )));
    h.fill_sign_up();
    h.submit().await;

    assert_eq!(h.profiles.calls().upsert, 0);
    let alert = h.auth_ui().alert.as_ref().expect("failure alert");
    assert_eq!(
        alert.message,
        "Falha na autenticação: Password should be at least 6 characters"
    );
}

#[tokio::test]
async fn sign_up_for_existing_address_asks_to_check_inbox() {
    let mut h = Harness::boot(
        StubAuthProvider::new().with_account("maria@example.com", "other"),
        StubProfileRepository::new(),
    )
    .await;
    h.fill_sign_up();
    h.submit().await;

    assert_eq!(h.profiles.calls().upsert, 0);
    let alert = h.auth_ui().alert.as_ref().expect("notice");
    assert_eq!(alert.title, "Verifique seu email");

    h.app.dispatch(AuthMessage::AcknowledgeAlert);
    assert_eq!(h.auth_ui().mode, AuthMode::SignIn);
    assert!(h.auth_ui().form.is_empty());
}

#[tokio::test]
async fn auto_confirmed_sign_up_lands_home() {
    let mut h = Harness::boot(
        StubAuthProvider::new().with_auto_confirm(true),
        StubProfileRepository::new(),
    )
    .await;
    h.fill_sign_up();
    h.submit().await;

    // The profile write ran even though the screen unmounted on sign-in.
    assert_eq!(h.profiles.calls().upsert, 1);
    assert_eq!(h.route(), Route::Home);
    assert_eq!(
        h.app.state().domains.profile.greeting(),
        "Bem-vindo, Maria!"
    );
}

#[tokio::test]
async fn auto_confirmed_sign_up_reports_profile_failure_over_tabs() {
    let profiles = StubProfileRepository::new();
    profiles.fail_upsert(Some(ProviderError::rejected(403, "permission denied")));
    let mut h =
        Harness::boot(StubAuthProvider::new().with_auto_confirm(true), profiles).await;
    h.fill_sign_up();
    h.submit().await;

    // Signed in before the write failed; the identity is kept.
    assert_eq!(h.route(), Route::Home);
    assert!(h.app.state().domains.auth.ui.is_none());
    assert!(h.user_id().is_some());
    assert_eq!(h.profiles.calls().upsert, 1);

    let notice = h
        .app
        .state()
        .domains
        .profile
        .notice
        .as_ref()
        .expect("notice shown");
    assert_eq!(notice.kind, AlertKind::Error);
    assert_eq!(notice.title, "Erro");
    assert_eq!(notice.message, "Falha ao criar perfil: permission denied");

    h.app.dispatch(ProfileMessage::DismissNotice);
    assert!(h.app.state().domains.profile.notice.is_none());
}

#[tokio::test]
async fn forgot_password_sends_email_and_returns_to_sign_in() {
    let mut h = Harness::signed_out().await;
    h.app.dispatch(AuthMessage::ShowForgotPassword);
    h.fill(&[(AuthField::Email, " ana@example.com ")]);
    h.submit().await;

    assert_eq!(
        h.auth.reset_requests(),
        vec![(EMAIL.to_string(), "myapp://reset-password".to_string())]
    );
    let alert = h.auth_ui().alert.as_ref().expect("confirmation");
    assert_eq!(alert.title, "Email Enviado");
    assert_eq!(h.auth_ui().mode, AuthMode::ForgotPassword);

    h.app.dispatch(AuthMessage::AcknowledgeAlert);
    assert_eq!(h.auth_ui().mode, AuthMode::SignIn);
}

#[tokio::test]
async fn forgot_password_requires_email() {
    let mut h = Harness::signed_out().await;
    h.app.dispatch(AuthMessage::ShowForgotPassword);
    h.submit().await;

    assert_eq!(h.auth.calls().reset_password, 0);
    let alert = h.auth_ui().alert.as_ref().expect("validation alert");
    assert_eq!(alert.message, "Por favor, digite seu email");
}

#[tokio::test]
async fn mode_triggers_follow_transition_table() {
    let mut h = Harness::signed_out().await;
    h.fill_sign_up();
    assert_eq!(h.auth_ui().mode, AuthMode::SignUp);

    h.app.dispatch(AuthMessage::ShowForgotPassword);
    assert_eq!(h.auth_ui().mode, AuthMode::SignUp);
    assert_eq!(h.auth_ui().form.last_name, "Souza");

    h.app.dispatch(AuthMessage::BackToSignIn);
    assert_eq!(h.auth_ui().mode, AuthMode::SignIn);
    assert!(h.auth_ui().form.is_empty());
}
