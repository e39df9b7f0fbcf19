//! Navigation guard
//!
//! Decides whether a page may be shown given the presence of an access
//! token. Public pages bounce signed-in users home; everything else bounces
//! anonymous users to login.

use kanflow_domain::constants::{HOME_PATH, PUBLIC_PATHS};

/// Outcome of [`guard_route`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    /// Carries the configured login path.
    RedirectToLogin(String),
    RedirectHome(&'static str),
}

/// `true` for `/login`, `/register` and anything below them.
#[must_use]
pub fn is_public_path(path: &str) -> bool {
    PUBLIC_PATHS.iter().any(|public| {
        path == *public
            || path.strip_prefix(public).is_some_and(|rest| rest.starts_with('/'))
    })
}

/// `login_path` is where anonymous users are sent; pass the same path the
/// session teardown redirects to.
#[must_use]
pub fn guard_route(path: &str, has_access_token: bool, login_path: &str) -> RouteDecision {
    match (is_public_path(path), has_access_token) {
        (false, false) => RouteDecision::RedirectToLogin(login_path.to_string()),
        (true, true) => RouteDecision::RedirectHome(HOME_PATH),
        _ => RouteDecision::Allow,
    }
}
