//! Gate decision table.
//!
//! Rules are evaluated in order and the first match wins:
//!
//! | zone  | summary       | extra condition          | action                        |
//! |-------|---------------|--------------------------|-------------------------------|
//! | auth  | signed in     | not the sign-out page    | redirect to landing           |
//! | admin | signed out    | not the admin sign-in    | redirect to admin sign-in     |
//! | user  | signed out    |                          | redirect to sign-in + callback|
//! | *     | *             |                          | allow                         |

use super::summary::SessionSummary;
use super::zone::RouteZone;

/// Fixed paths the gate redirects to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatePaths {
    pub landing: &'static str,
    pub sign_in: &'static str,
    pub admin_sign_in: &'static str,
    pub sign_out: &'static str,
    pub callback_param: &'static str,
}

impl Default for GatePaths {
    fn default() -> Self {
        Self {
            landing: "/dashboard",
            sign_in: "/auth/login",
            admin_sign_in: "/admin/login",
            sign_out: "/auth/logout",
            callback_param: "callbackUrl",
        }
    }
}

impl GatePaths {
    /// `<sign_in>?<callback_param>=<path>` with each path segment percent-encoded.
    #[must_use]
    pub fn sign_in_with_callback(&self, path: &str) -> String {
        callback_url(self.sign_in, self.callback_param, path)
    }

    #[must_use]
    pub fn admin_sign_in_with_callback(&self, path: &str) -> String {
        callback_url(self.admin_sign_in, self.callback_param, path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    Redirect(String),
}

/// Decide what to do with a request for `path` given the summary cookie.
#[must_use]
pub fn decide(path: &str, summary: SessionSummary, paths: &GatePaths) -> GateDecision {
    let authenticated = summary.authenticated;
    match RouteZone::classify(path) {
        RouteZone::Auth if authenticated && !same_page(path, paths.sign_out) => {
            GateDecision::Redirect(paths.landing.to_owned())
        }
        RouteZone::Admin if !authenticated && !same_page(path, paths.admin_sign_in) => {
            GateDecision::Redirect(paths.admin_sign_in.to_owned())
        }
        RouteZone::User if !authenticated => GateDecision::Redirect(paths.sign_in_with_callback(path)),
        _ => GateDecision::Allow,
    }
}

/// Equal up to a trailing slash, so `/admin/login/` is the admin sign-in page.
fn same_page(path: &str, page: &str) -> bool {
    path.strip_suffix('/').unwrap_or(path) == page
}

fn callback_url(target: &str, param: &str, path: &str) -> String {
    format!("{target}?{param}={}", encode_path(path))
}

/// Percent-encode each segment, keeping `/` separators literal.
pub(crate) fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
#[path = "decision_test.rs"]
mod tests;
