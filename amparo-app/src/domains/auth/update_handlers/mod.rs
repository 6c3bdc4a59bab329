pub mod auth_flow;
pub mod completions;
pub mod form;

pub use auth_flow::*;
pub use completions::*;
pub use form::*;

use crate::common::ScreenId;
use crate::state::State;

use super::types::AuthUiState;

/// The mounted auth screen, if it is the one identified by `screen`.
///
/// Completions from a screen that has since been replaced resolve to `None`
/// and are dropped.
pub(crate) fn mounted_screen(
    state: &mut State,
    screen: ScreenId,
) -> Option<&mut AuthUiState> {
    match state.domains.auth.ui.as_mut() {
        Some(ui) if ui.screen == screen => Some(ui),
        Some(ui) => {
            log::debug!(
                "[Auth] Ignoring completion for {screen}; {} is mounted",
                ui.screen
            );
            None
        }
        None => {
            log::debug!("[Auth] Ignoring completion for unmounted {screen}");
            None
        }
    }
}
