//! Domain modules for the Amparo app
//!
//! Each domain owns a slice of [`State`](crate::state::State) and an update
//! function. Reactions that span domains go through
//! [`cross_domain`](crate::common::messages::cross_domain).

pub mod auth;
pub mod lifecycle;
pub mod navigation;
pub mod profile;
pub mod session;

/// Every domain's state.
#[derive(Debug)]
pub struct DomainRegistry {
    pub session: session::SessionDomainState,
    pub auth: auth::AuthDomainState,
    pub navigation: navigation::NavigationDomainState,
    pub profile: profile::ProfileDomainState,
    pub lifecycle: lifecycle::LifecycleDomainState,
}

impl DomainRegistry {
    pub fn new(initial_route: navigation::Route) -> Self {
        Self {
            session: session::SessionDomainState::default(),
            auth: auth::AuthDomainState::default(),
            navigation: navigation::NavigationDomainState::new(initial_route),
            profile: profile::ProfileDomainState::default(),
            lifecycle: lifecycle::LifecycleDomainState::default(),
        }
    }
}
