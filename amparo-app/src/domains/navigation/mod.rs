//! Navigation stack, route groups and the session guards.

pub mod guard;
pub mod messages;
pub mod router;
pub mod update;

pub use guard::{AuthGuard, Gate, RedirectDecision, TabSessionRedirect, decide};
pub use messages::NavigationMessage;
pub use router::{Route, RouteGroup, Router};

#[derive(Debug, Clone)]
pub struct NavigationDomainState {
    pub router: Router,
}

impl NavigationDomainState {
    pub fn new(initial: Route) -> Self {
        Self {
            router: Router::new(initial),
        }
    }
}

impl Default for NavigationDomainState {
    fn default() -> Self {
        Self::new(Route::Home)
    }
}
