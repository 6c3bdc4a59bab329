use super::update_handlers::*;
use crate::common::Task;
use crate::common::messages::{DomainMessage, DomainUpdateResult};
use crate::domains::auth::messages::AuthMessage;
use crate::domains::auth::types::{AuthMode, AuthUiState};
use crate::domains::navigation::Route;
use crate::state::State;

// Helper macro to wrap task results
macro_rules! wrap_task {
    ($task:expr) => {
        DomainUpdateResult::task($task.map(DomainMessage::Auth))
    };
}

pub fn update_auth(state: &mut State, message: AuthMessage) -> DomainUpdateResult {
    match message {
        AuthMessage::UpdateField(field, value) => {
            wrap_task!(handle_update_field(state, field, value))
        }

        AuthMessage::ShowSignUp => {
            wrap_task!(handle_transition(state, AuthMode::SignUp))
        }
        AuthMessage::ShowForgotPassword => {
            wrap_task!(handle_transition(state, AuthMode::ForgotPassword))
        }
        AuthMessage::BackToSignIn => {
            wrap_task!(handle_transition(state, AuthMode::SignIn))
        }

        AuthMessage::Submit => wrap_task!(handle_submit(state)),

        AuthMessage::SignInCompleted(screen, result) => {
            wrap_task!(handle_sign_in_completed(state, screen, result))
        }
        AuthMessage::SignUpCompleted(screen, result) => {
            handle_sign_up_completed(state, screen, result)
        }
        AuthMessage::ResetEmailCompleted(screen, result) => {
            wrap_task!(handle_reset_email_completed(state, screen, result))
        }

        AuthMessage::AcknowledgeAlert => {
            wrap_task!(handle_acknowledge_alert(state))
        }
    }
}

/// Mount a fresh auth screen when the login route becomes visible and drop
/// it when it is left.
pub fn on_route_changed(
    state: &mut State,
    from: Route,
    to: Route,
) -> Task<DomainMessage> {
    if from == Route::Login && state.domains.auth.ui.take().is_some() {
        log::debug!("[Auth] Auth screen unmounted");
    }
    if to == Route::Login {
        let screen = state.next_screen_id();
        log::debug!("[Auth] Auth screen mounted as {screen}");
        state.domains.auth.ui = Some(AuthUiState::new(screen));
    }
    Task::none()
}
