//! Navigation bar contents, which depend on who is logged in.

use crate::models::User;
use crate::router::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavTarget {
    Go(Route),
    Logout,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub target: NavTarget,
}

impl NavLink {
    fn go(label: &'static str, route: Route) -> Self {
        Self {
            label,
            target: NavTarget::Go(route),
        }
    }
}

pub fn nav_links(viewer: Option<&User>) -> Vec<NavLink> {
    let mut links = vec![NavLink::go("Browse Projects", Route::Projects)];
    match viewer {
        Some(user) => {
            links.push(NavLink::go("Profile", Route::Profile(user.id)));
            links.push(NavLink {
                label: "Logout",
                target: NavTarget::Logout,
            });
        }
        None => {
            links.push(NavLink::go("Login", Route::Login));
            links.push(NavLink::go("Register", Route::Register));
        }
    }
    links
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64) -> User {
        serde_json::from_value(serde_json::json!({"id": id, "username": "ada"}))
            .expect("valid user")
    }

    #[test]
    fn test_anonymous_links() {
        let labels: Vec<&str> = nav_links(None).iter().map(|l| l.label).collect();
        assert_eq!(labels, vec!["Browse Projects", "Login", "Register"]);
    }

    #[test]
    fn test_signed_in_links() {
        let viewer = user(9);
        let links = nav_links(Some(&viewer));
        assert_eq!(links[1].target, NavTarget::Go(Route::Profile(9)));
        assert_eq!(links[2].target, NavTarget::Logout);
        assert_eq!(links.len(), 3);
    }
}
