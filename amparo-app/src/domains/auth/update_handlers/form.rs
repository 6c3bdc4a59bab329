use crate::common::Task;
use crate::domains::auth::types::{AlertAction, AuthField, AuthMode};
use crate::state::State;

use super::super::messages::AuthMessage;

pub fn handle_update_field(
    state: &mut State,
    field: AuthField,
    value: String,
) -> Task<AuthMessage> {
    if let Some(ui) = state.domains.auth.ui.as_mut() {
        ui.form.set(field, value);
    }
    Task::none()
}

pub fn handle_transition(state: &mut State, target: AuthMode) -> Task<AuthMessage> {
    let Some(ui) = state.domains.auth.ui.as_mut() else {
        log::warn!("[Auth] Mode change to {target:?} without a mounted auth screen");
        return Task::none();
    };
    if ui.is_submitting {
        log::debug!("[Auth] Ignoring mode change to {target:?} while submitting");
        return Task::none();
    }
    let from = ui.mode;
    if ui.transition(target) {
        ui.alert = None;
        log::debug!("[Auth] Mode {from:?} -> {target:?}");
    } else {
        log::warn!("[Auth] Rejected mode transition {from:?} -> {target:?}");
    }
    Task::none()
}

pub fn handle_acknowledge_alert(state: &mut State) -> Task<AuthMessage> {
    let Some(ui) = state.domains.auth.ui.as_mut() else {
        return Task::none();
    };
    let Some(alert) = ui.alert.take() else {
        return Task::none();
    };
    match alert.on_acknowledge {
        AlertAction::Dismiss => {}
        AlertAction::ResetToSignIn => ui.reset_to_sign_in(),
        AlertAction::ReturnToSignIn => ui.mode = AuthMode::SignIn,
    }
    Task::none()
}
