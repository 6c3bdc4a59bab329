//! Session-gated navigation.
//!
//! Both the root [`AuthGuard`] and the narrower [`TabSessionRedirect`] call
//! the same [`decide`] function, so they cannot disagree.

use crate::domains::session::SessionSnapshot;

use super::router::{Route, RouteGroup, Router};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RedirectDecision {
    /// Session still resolving; render a placeholder, do not navigate.
    Undecided,
    RedirectToLogin,
    RedirectToHome,
    NoAction,
}

impl RedirectDecision {
    pub fn target(&self) -> Option<Route> {
        match self {
            RedirectDecision::RedirectToLogin => Some(Route::Login),
            RedirectDecision::RedirectToHome => Some(Route::Home),
            RedirectDecision::Undecided | RedirectDecision::NoAction => None,
        }
    }
}

/// Whether the requested screen may render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Blocking placeholder while the session resolves.
    Blocked,
    Open,
}

/// The redirect rule. Pure and total.
pub fn decide(
    has_session: bool,
    is_loading: bool,
    group: RouteGroup,
) -> RedirectDecision {
    if is_loading {
        return RedirectDecision::Undecided;
    }
    match (has_session, group) {
        (false, RouteGroup::Auth) => RedirectDecision::NoAction,
        (false, _) => RedirectDecision::RedirectToLogin,
        (true, RouteGroup::Auth) => RedirectDecision::RedirectToHome,
        (true, _) => RedirectDecision::NoAction,
    }
}

fn apply(decision: RedirectDecision, router: &mut Router) -> Option<Route> {
    let target = decision.target()?;
    router.redirect(target).then_some(target)
}

/// Root guard: keeps signed-out users inside the auth screens and signed-in
/// users out of them.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthGuard;

impl AuthGuard {
    pub fn evaluate(snapshot: &SessionSnapshot, router: &Router) -> RedirectDecision {
        decide(
            snapshot.has_session(),
            snapshot.is_loading,
            router.current_group(),
        )
    }

    /// Apply the decision with a non-stacking redirect.
    ///
    /// Level-triggered: call it after every change. Returns the route
    /// navigated to, or `None` when nothing moved (including repeat calls
    /// with unchanged inputs).
    pub fn enforce(snapshot: &SessionSnapshot, router: &mut Router) -> Option<Route> {
        let decision = Self::evaluate(snapshot, router);
        let moved = apply(decision, router);
        if let Some(route) = moved {
            log::info!("[Guard] {decision:?}: redirected to {route}");
        }
        moved
    }

    pub fn gate(snapshot: &SessionSnapshot, router: &Router) -> Gate {
        match Self::evaluate(snapshot, router) {
            RedirectDecision::Undecided => Gate::Blocked,
            _ => Gate::Open,
        }
    }
}

/// Guard local to the tab navigator: re-confirms a session still exists
/// while a tab is shown.
#[derive(Debug, Clone, Copy, Default)]
pub struct TabSessionRedirect;

impl TabSessionRedirect {
    pub fn evaluate(snapshot: &SessionSnapshot) -> RedirectDecision {
        decide(snapshot.has_session(), snapshot.is_loading, RouteGroup::Tabs)
    }

    /// Only acts while a tab is on top of the stack.
    pub fn enforce(snapshot: &SessionSnapshot, router: &mut Router) -> Option<Route> {
        if router.current_group() != RouteGroup::Tabs {
            return None;
        }
        let decision = Self::evaluate(snapshot);
        let moved = apply(decision, router);
        if let Some(route) = moved {
            log::info!("[Guard] Tab session lost: redirected to {route}");
        }
        moved
    }

    /// Tabs render nothing while the session is loading or absent, so tab
    /// content never shows before the redirect to login lands.
    pub fn gate(snapshot: &SessionSnapshot) -> Gate {
        match Self::evaluate(snapshot) {
            RedirectDecision::Undecided | RedirectDecision::RedirectToLogin => {
                Gate::Blocked
            }
            RedirectDecision::RedirectToHome | RedirectDecision::NoAction => Gate::Open,
        }
    }
}
