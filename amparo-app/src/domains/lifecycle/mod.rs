//! Foreground/background transitions of the host app.
//!
//! Token auto-refresh only runs while the app is in the foreground.

use crate::common::messages::DomainUpdateResult;
use crate::state::State;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppLifecycle {
    #[default]
    Foreground,
    Background,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LifecycleMessage {
    Changed(AppLifecycle),
}

impl LifecycleMessage {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Changed(_) => "Lifecycle::Changed",
        }
    }
}

#[derive(Debug, Default)]
pub struct LifecycleDomainState {
    pub current: Option<AppLifecycle>,
    pub auto_refresh_running: bool,
}

pub fn update_lifecycle(
    state: &mut State,
    message: LifecycleMessage,
) -> DomainUpdateResult {
    match message {
        LifecycleMessage::Changed(next) => {
            let lifecycle = &mut state.domains.lifecycle;
            if lifecycle.current == Some(next) {
                return DomainUpdateResult::none();
            }
            lifecycle.current = Some(next);

            if !state.settings.auto_refresh {
                log::debug!("[Lifecycle] {next:?}; auto-refresh disabled by config");
                return DomainUpdateResult::none();
            }

            match next {
                AppLifecycle::Foreground if !lifecycle.auto_refresh_running => {
                    log::debug!("[Lifecycle] Foreground: starting token auto-refresh");
                    state.services.auth.start_auto_refresh();
                    lifecycle.auto_refresh_running = true;
                }
                AppLifecycle::Background if lifecycle.auto_refresh_running => {
                    log::debug!("[Lifecycle] Background: stopping token auto-refresh");
                    state.services.auth.stop_auto_refresh();
                    lifecycle.auto_refresh_running = false;
                }
                _ => {}
            }
            DomainUpdateResult::none()
        }
    }
}
