use amparo_model::Session;

use crate::common::messages::{CrossDomainEvent, DomainUpdateResult};
use crate::common::{Alert, AlertKind, ScreenId, Task};
use crate::domains::auth::copy;
use crate::domains::auth::errors::AuthFlowError;
use crate::domains::auth::messages::{AuthMessage, SignUpCompletion};
use crate::domains::auth::types::{AlertAction, AuthUiState};
use crate::state::State;

use super::mounted_screen;

fn failure_alert(ui: &mut AuthUiState, title: &str, err: &AuthFlowError) {
    ui.alert = Some(Alert::error(title, err.user_message()));
}

pub fn handle_sign_in_completed(
    state: &mut State,
    screen: ScreenId,
    result: Result<Session, AuthFlowError>,
) -> Task<AuthMessage> {
    let Some(ui) = mounted_screen(state, screen) else {
        return Task::none();
    };
    ui.is_submitting = false;
    match result {
        Ok(session) => {
            // The session itself arrives through the store's change stream;
            // the guard moves us off this screen once it does.
            log::info!("[Auth] Signed in as {}", session.user_id());
        }
        Err(err) => {
            log::warn!("[Auth] Sign-in failed: {err}");
            failure_alert(ui, copy::TITLE_SIGN_IN_ERROR, &err);
        }
    }
    Task::none()
}

pub fn handle_sign_up_completed(
    state: &mut State,
    screen: ScreenId,
    result: Result<SignUpCompletion, AuthFlowError>,
) -> DomainUpdateResult {
    let Some(ui) = mounted_screen(state, screen) else {
        // An auto-confirmed sign-up signs in before the profile write
        // finishes, so the guard may already have left the auth screen.
        if let Err(err @ AuthFlowError::ProfileWrite { .. }) = result {
            log::warn!("[Auth] Sign-up failed after leaving the auth screen: {err}");
            return DomainUpdateResult::event(CrossDomainEvent::NoticeRaised {
                title: err.title().to_string(),
                message: err.user_message(),
            });
        }
        return DomainUpdateResult::none();
    };
    ui.is_submitting = false;
    match result {
        Ok(SignUpCompletion::Created(user_id)) => {
            log::info!("[Auth] Account {user_id} created");
            ui.alert = Some(Alert::new(
                AlertKind::Success,
                copy::TITLE_ACCOUNT_CREATED,
                copy::ACCOUNT_CREATED,
                AlertAction::ResetToSignIn,
            ));
        }
        Ok(SignUpCompletion::ConfirmationPending) => {
            ui.alert = Some(Alert::new(
                AlertKind::Info,
                copy::TITLE_CHECK_INBOX,
                copy::CONFIRM_EMAIL,
                AlertAction::ResetToSignIn,
            ));
        }
        Err(err) => {
            // Fields stay as entered so the user can retry.
            log::warn!("[Auth] Sign-up failed: {err}");
            failure_alert(ui, err.title(), &err);
        }
    }
    DomainUpdateResult::none()
}

pub fn handle_reset_email_completed(
    state: &mut State,
    screen: ScreenId,
    result: Result<(), AuthFlowError>,
) -> Task<AuthMessage> {
    let Some(ui) = mounted_screen(state, screen) else {
        return Task::none();
    };
    ui.is_submitting = false;
    match result {
        Ok(()) => {
            log::info!("[Auth] Password reset email sent");
            ui.alert = Some(Alert::new(
                AlertKind::Success,
                copy::TITLE_RESET_SENT,
                copy::RESET_SENT,
                AlertAction::ReturnToSignIn,
            ));
        }
        Err(err) => {
            log::warn!("[Auth] Password reset failed: {err}");
            failure_alert(ui, err.title(), &err);
        }
    }
    Task::none()
}
