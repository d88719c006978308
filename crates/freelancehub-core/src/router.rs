//! Client-side routes and navigation history.

use crate::auth::gate::{Access, AccessGate};
use crate::auth::AuthState;

/// Every screen the client can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Projects,
    Project(i64),
    Profile(i64),
    /// The logged-in user's own profile
    MyProfile,
    Login,
    Register,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Projects => "/projects".to_string(),
            Route::Project(id) => format!("/project/{}", id),
            Route::Profile(id) => format!("/profile/{}", id),
            Route::MyProfile => "/profile/me".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
        }
    }

    pub fn parse(path: &str) -> Option<Route> {
        let trimmed = path.trim().trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Some(Route::Home),
            ["projects"] => Some(Route::Projects),
            ["project", id] => id.parse().ok().map(Route::Project),
            ["profile", "me"] => Some(Route::MyProfile),
            ["profile", id] => id.parse().ok().map(Route::Profile),
            ["login"] => Some(Route::Login),
            ["register"] => Some(Route::Register),
            _ => None,
        }
    }

    /// Routes only an authenticated session may render
    pub fn is_protected(&self) -> bool {
        matches!(self, Route::MyProfile)
    }

    pub fn title(&self) -> String {
        match self {
            Route::Home => "Home".to_string(),
            Route::Projects => "Browse Projects".to_string(),
            Route::Project(id) => format!("Project #{}", id),
            Route::Profile(id) => format!("Profile #{}", id),
            Route::MyProfile => "My Profile".to_string(),
            Route::Login => "Login".to_string(),
            Route::Register => "Register".to_string(),
        }
    }
}

/// Navigation history. The last entry is the current route; there is always one.
#[derive(Debug, Clone)]
pub struct Navigator {
    history: Vec<Route>,
}

impl Navigator {
    pub fn new(start: Route) -> Self {
        Self {
            history: vec![start],
        }
    }

    pub fn current(&self) -> Route {
        *self.history.last().unwrap_or(&Route::Home)
    }

    pub fn history(&self) -> &[Route] {
        &self.history
    }

    pub fn push(&mut self, route: Route) {
        if self.current() != route {
            self.history.push(route);
        }
    }

    /// Swap the current entry for `route` without growing the history
    pub fn replace(&mut self, route: Route) {
        match self.history.last_mut() {
            Some(last) => *last = route,
            None => self.history.push(route),
        }
    }

    /// Go back one entry. Returns false when already at the first entry.
    pub fn back(&mut self) -> bool {
        if self.history.len() > 1 {
            self.history.pop();
            true
        } else {
            false
        }
    }

    /// Navigate to `route`, letting the access gate redirect if needed.
    pub fn navigate<S: AuthState + ?Sized>(&mut self, session: &S, route: Route) -> Route {
        self.push(route);
        self.enforce(session)
    }

    /// Re-check the current route against the gate, e.g. after a logout.
    /// A redirect replaces the gated entry so going back never lands on it.
    pub fn enforce<S: AuthState + ?Sized>(&mut self, session: &S) -> Route {
        if let Access::Redirect(redirect) = AccessGate::check_route(session, self.current()) {
            if redirect.replace {
                self.replace(redirect.to);
            } else {
                self.push(redirect.to);
            }
        }
        self.current()
    }
}
