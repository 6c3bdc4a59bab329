use std::sync::Arc;

use amparo_model::ProfileUpsert;
use chrono::Utc;

use crate::common::{Alert, Task};
use crate::domains::auth::errors::{AuthFlowError, ValidationError};
use crate::domains::auth::messages::{AuthMessage, SignUpCompletion};
use crate::domains::auth::types::{AuthForm, AuthMode};
use crate::infra::services::{
    AuthProvider, Credentials, ProfileRepository, ResetPasswordOptions,
};
use crate::state::State;

/// Submit the form of the active mode.
///
/// Validation happens here, at submission time only. A submit while a call
/// is already in flight is dropped, so one form never has two provider
/// calls outstanding.
pub fn handle_submit(state: &mut State) -> Task<AuthMessage> {
    let redirect_to = state.settings.password_reset_redirect.clone();
    let auth = Arc::clone(&state.services.auth);
    let profiles = Arc::clone(&state.services.profiles);

    let Some(ui) = state.domains.auth.ui.as_mut() else {
        log::warn!("[Auth] Submit without a mounted auth screen");
        return Task::none();
    };
    if !ui.can_submit() {
        log::debug!("[Auth] Submit ignored: {:?} already in flight", ui.mode);
        return Task::none();
    }

    ui.alert = None;
    let missing = ui.form.missing_fields(ui.mode);
    if !missing.is_empty() {
        let err = ValidationError {
            mode: ui.mode,
            missing,
        };
        log::debug!("[Auth] Validation failed for {:?}: {:?}", err.mode, err.missing);
        ui.alert = Some(Alert::error(err.title(), err.message()));
        return Task::none();
    }

    ui.is_submitting = true;
    let screen = ui.screen;
    let form = ui.form.clone();

    match ui.mode {
        AuthMode::SignIn => {
            log::info!("[Auth] Signing in");
            Task::perform(sign_in(auth, form), move |result| {
                AuthMessage::SignInCompleted(screen, result)
            })
        }
        AuthMode::SignUp => {
            log::info!("[Auth] Creating account");
            Task::perform(sign_up(auth, profiles, form), move |result| {
                AuthMessage::SignUpCompleted(screen, result)
            })
        }
        AuthMode::ForgotPassword => {
            log::info!("[Auth] Requesting password reset email");
            Task::perform(
                reset_password(auth, form, ResetPasswordOptions { redirect_to }),
                move |result| AuthMessage::ResetEmailCompleted(screen, result),
            )
        }
    }
}

fn credentials(form: &AuthForm) -> Credentials {
    Credentials::new(form.email.trim(), form.password.clone())
}

pub async fn sign_in(
    auth: Arc<dyn AuthProvider>,
    form: AuthForm,
) -> Result<amparo_model::Session, AuthFlowError> {
    Ok(auth.sign_in(credentials(&form)).await?)
}

/// Create the identity, then its profile row.
///
/// Stops at the first failure. A profile failure leaves the identity in
/// place.
pub async fn sign_up(
    auth: Arc<dyn AuthProvider>,
    profiles: Arc<dyn ProfileRepository>,
    form: AuthForm,
) -> Result<SignUpCompletion, AuthFlowError> {
    let outcome = auth
        .sign_up(credentials(&form))
        .await
        .map_err(AuthFlowError::Identity)?;

    let Some(user) = outcome.user else {
        log::info!("[Auth] Sign-up pending email confirmation");
        return Ok(SignUpCompletion::ConfirmationPending);
    };

    let row = ProfileUpsert {
        id: user.id,
        name: form.first_name.trim().to_string(),
        last_name: form.last_name.trim().to_string(),
        phone_number: form.phone_number(),
        updated_at: Utc::now(),
    };
    profiles.upsert_profile(row).await.map_err(|source| {
        log::error!(
            "[Auth] Identity {} created but profile write failed: {source}",
            user.id
        );
        AuthFlowError::ProfileWrite {
            user_id: user.id,
            source,
        }
    })?;

    Ok(SignUpCompletion::Created(user.id))
}

pub async fn reset_password(
    auth: Arc<dyn AuthProvider>,
    form: AuthForm,
    options: ResetPasswordOptions,
) -> Result<(), AuthFlowError> {
    Ok(auth
        .reset_password(form.email.trim().to_string(), options)
        .await?)
}
