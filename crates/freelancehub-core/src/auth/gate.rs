//! Route-level access gate.
//!
//! The gate reads the session synchronously; it has no loading state of its
//! own. Front ends should hold off rendering while the session is loading.

use crate::router::Route;

use super::AuthState;

/// Where to send an unauthenticated visitor, and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redirect {
    pub to: Route,
    /// Replace the current history entry instead of pushing a new one
    pub replace: bool,
}

impl Redirect {
    pub fn to_login() -> Self {
        Self {
            to: Route::Login,
            replace: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    Redirect(Redirect),
}

/// Output of [`AccessGate::guard`]: the rendered subtree or a redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gated<T> {
    Render(T),
    Redirect(Redirect),
}

pub struct AccessGate;

impl AccessGate {
    /// Decide access to a protected subtree
    pub fn check<S: AuthState + ?Sized>(session: &S) -> Access {
        if session.is_authenticated() {
            Access::Granted
        } else {
            Access::Redirect(Redirect::to_login())
        }
    }

    /// Decide access to a route; public routes are always granted
    pub fn check_route<S: AuthState + ?Sized>(session: &S, route: Route) -> Access {
        if route.is_protected() {
            Self::check(session)
        } else {
            Access::Granted
        }
    }

    /// Render the protected subtree, or return the redirect without rendering it.
    pub fn guard<S, T, F>(session: &S, render: F) -> Gated<T>
    where
        S: AuthState + ?Sized,
        F: FnOnce() -> T,
    {
        match Self::check(session) {
            Access::Granted => Gated::Render(render()),
            Access::Redirect(redirect) => Gated::Redirect(redirect),
        }
    }
}
