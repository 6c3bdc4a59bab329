//! Application state.
//!
//! Domain-specific state lives in the [`DomainRegistry`]; only the service
//! handles and the settings shared by several domains sit at the top level.

use amparo_config::Config;
use amparo_config::constants::DEFAULT_PASSWORD_RESET_REDIRECT;

use crate::common::ScreenId;
use crate::domains::DomainRegistry;
use crate::domains::navigation::{AuthGuard, Gate, Route, TabSessionRedirect};
use crate::infra::services::Services;

/// Settings the update functions read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSettings {
    /// Deep link embedded in password reset emails.
    pub password_reset_redirect: String,
    /// Run token auto-refresh while the app is in the foreground.
    pub auto_refresh: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            password_reset_redirect: DEFAULT_PASSWORD_RESET_REDIRECT.to_string(),
            auto_refresh: true,
        }
    }
}

impl From<&Config> for AppSettings {
    fn from(config: &Config) -> Self {
        Self {
            password_reset_redirect: config.auth.password_reset_redirect.clone(),
            auto_refresh: config.auth.auto_refresh,
        }
    }
}

#[derive(Debug)]
pub struct State {
    pub services: Services,
    pub settings: AppSettings,
    pub domains: DomainRegistry,
    next_screen: u64,
}

impl State {
    /// Fresh state on the home tab with the session still resolving.
    ///
    /// The guards keep the tab blocked until the first session query lands.
    pub fn new(services: Services, settings: AppSettings) -> Self {
        Self {
            services,
            settings,
            domains: DomainRegistry::new(Route::Home),
            next_screen: 0,
        }
    }

    /// Allocate the identity for a newly mounted screen.
    pub fn next_screen_id(&mut self) -> ScreenId {
        self.next_screen += 1;
        ScreenId(self.next_screen)
    }

    pub fn current_route(&self) -> Route {
        self.domains.navigation.router.current()
    }

    /// Whether the current route may render or shows the loading
    /// placeholder.
    ///
    /// Tab routes additionally pass through [`TabSessionRedirect::gate`].
    pub fn gate(&self) -> Gate {
        let router = &self.domains.navigation.router;
        self.domains.session.store.with_snapshot(|snapshot| {
            match AuthGuard::gate(snapshot, router) {
                Gate::Open if router.current().is_tab() => {
                    TabSessionRedirect::gate(snapshot)
                }
                gate => gate,
            }
        })
    }
}
