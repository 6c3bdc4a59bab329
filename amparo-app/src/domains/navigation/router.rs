/// Top-level section a route belongs to. Guards only look at this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteGroup {
    /// Unauthenticated screens (login, sign-up, password reset).
    Auth,
    /// The tab navigator shown to signed-in users.
    Tabs,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Home,
    Community,
    Services,
    Settings,
    Modal,
}

impl Route {
    pub const TABS: [Route; 4] =
        [Route::Home, Route::Community, Route::Services, Route::Settings];

    pub fn group(&self) -> RouteGroup {
        match self {
            Route::Login => RouteGroup::Auth,
            Route::Home | Route::Community | Route::Services | Route::Settings => {
                RouteGroup::Tabs
            }
            Route::Modal => RouteGroup::Other,
        }
    }

    pub fn is_tab(&self) -> bool {
        self.group() == RouteGroup::Tabs
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/(auth)/login",
            Route::Home => "/(tabs)",
            Route::Community => "/(tabs)/community",
            Route::Services => "/(tabs)/service",
            Route::Settings => "/(tabs)/config",
            Route::Modal => "/modal",
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Navigation stack. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Router {
    stack: Vec<Route>,
}

impl Router {
    pub fn new(initial: Route) -> Self {
        Self {
            stack: vec![initial],
        }
    }

    pub fn current(&self) -> Route {
        // The stack always holds at least the root entry.
        self.stack.last().copied().unwrap_or(Route::Login)
    }

    pub fn current_group(&self) -> RouteGroup {
        self.current().group()
    }

    pub fn stack(&self) -> &[Route] {
        &self.stack
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn push(&mut self, route: Route) -> bool {
        self.stack.push(route);
        true
    }

    /// Switch tabs in place. Pushes when the top is not a tab.
    pub fn select_tab(&mut self, tab: Route) -> bool {
        if !tab.is_tab() {
            log::warn!("[Navigation] {tab} is not a tab route");
            return false;
        }
        match self.stack.last_mut() {
            Some(top) if *top == tab => false,
            Some(top) if top.is_tab() => {
                *top = tab;
                true
            }
            _ => self.push(tab),
        }
    }

    /// Pop one entry; the root entry is never popped.
    pub fn back(&mut self) -> bool {
        if self.stack.len() > 1 {
            self.stack.pop();
            true
        } else {
            false
        }
    }

    /// Replace the whole stack with `route` so the previous screens are not
    /// reachable through back navigation.
    ///
    /// No-op (returns false) when the stack already is exactly `[route]`.
    pub fn redirect(&mut self, route: Route) -> bool {
        if self.stack.as_slice() == [route] {
            return false;
        }
        self.stack.clear();
        self.stack.push(route);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_replaces_stack_and_is_idempotent() {
        let mut router = Router::new(Route::Home);
        router.push(Route::Modal);

        assert!(router.redirect(Route::Login));
        assert_eq!(router.stack(), &[Route::Login]);
        assert!(!router.redirect(Route::Login));
        assert_eq!(router.stack(), &[Route::Login]);
        assert!(!router.back());
    }

    #[test]
    fn select_tab_swaps_top_without_growing() {
        let mut router = Router::new(Route::Home);
        assert!(router.select_tab(Route::Settings));
        assert!(!router.select_tab(Route::Settings));
        assert_eq!(router.stack(), &[Route::Settings]);

        router.push(Route::Modal);
        assert!(router.select_tab(Route::Community));
        assert_eq!(router.stack(), &[Route::Settings, Route::Modal, Route::Community]);

        assert!(!router.select_tab(Route::Login));
    }

    #[test]
    fn groups_match_layout() {
        assert_eq!(Route::Login.group(), RouteGroup::Auth);
        assert!(Route::TABS.iter().all(Route::is_tab));
        assert_eq!(Route::Modal.group(), RouteGroup::Other);
    }
}
