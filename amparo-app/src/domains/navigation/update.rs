use crate::common::messages::{
    CrossDomainEvent, DomainMessage, DomainUpdateResult, cross_domain,
};
use crate::common::task::Task;
use crate::state::State;

use super::guard::{AuthGuard, TabSessionRedirect};
use super::messages::NavigationMessage;
use super::router::Router;

pub fn update_navigation(
    state: &mut State,
    message: NavigationMessage,
) -> DomainUpdateResult {
    match message {
        NavigationMessage::SelectTab(tab) => {
            navigate(state, |router| router.select_tab(tab))
        }
        NavigationMessage::Push(route) => {
            navigate(state, |router| router.push(route))
        }
        NavigationMessage::Back => navigate(state, Router::back),
        NavigationMessage::Replace(route) => {
            navigate(state, |router| router.redirect(route))
        }
    }
}

/// Mutate the router and report the visible route change, if any.
pub fn navigate(
    state: &mut State,
    f: impl FnOnce(&mut Router) -> bool,
) -> DomainUpdateResult {
    let router = &mut state.domains.navigation.router;
    let from = router.current();
    if !f(router) {
        return DomainUpdateResult::none();
    }
    let to = router.current();
    log::debug!("[Navigation] {from} -> {to} (depth {})", router.depth());
    DomainUpdateResult::event(CrossDomainEvent::RouteChanged { from, to })
}

/// Run both session guards against the current state.
///
/// Called after every message. Repeated calls with unchanged inputs do not
/// touch the router.
pub fn enforce_guards(state: &mut State) -> Task<DomainMessage> {
    let snapshot = state.domains.session.store.snapshot();

    let root = navigate(state, |router| {
        AuthGuard::enforce(&snapshot, router).is_some()
    });
    let mut task = cross_domain::drain(state, root);

    let tabs = navigate(state, |router| {
        TabSessionRedirect::enforce(&snapshot, router).is_some()
    });
    if !tabs.events.is_empty() {
        task = Task::batch([task, cross_domain::drain(state, tabs)]);
    }
    task
}
