//! Second-tier page checks.
//!
//! The edge gate only sees the summary cookie, which says "someone is signed
//! in" and nothing about who. Pages under `/admin` and `/dashboard` run one of
//! these guards against the store's settled state before rendering anything
//! sensitive. [`Access::Pending`] must render a neutral blocking view.

use std::borrow::Cow;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::types::AuthState;
use crate::gate::GatePaths;
use crate::gate::zone::RouteZone;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// Store has not settled yet.
    Pending,
    Granted,
    Redirect(String),
}

/// Admin area: signed in with the admin role.
#[must_use]
pub fn admin_access(state: &AuthState, path: &str, paths: &GatePaths) -> Access {
    if state.loading {
        Access::Pending
    } else if !state.is_signed_in() {
        Access::Redirect(paths.admin_sign_in_with_callback(path))
    } else if !state.is_admin() {
        Access::Redirect(paths.landing.to_owned())
    } else {
        Access::Granted
    }
}

/// User area: any signed-in identity.
#[must_use]
pub fn user_access(state: &AuthState, path: &str, paths: &GatePaths) -> Access {
    if state.loading {
        Access::Pending
    } else if !state.is_signed_in() {
        Access::Redirect(paths.sign_in_with_callback(path))
    } else {
        Access::Granted
    }
}

/// Sign-in, registration and forgot-password pages. Signed-in visitors are
/// sent on to their callback.
#[must_use]
pub fn auth_page_access(state: &AuthState, callback: Option<&str>, paths: &GatePaths) -> Access {
    if state.loading {
        Access::Pending
    } else if state.is_signed_in() {
        Access::Redirect(sanitize_callback(callback, paths))
    } else {
        Access::Granted
    }
}

/// Same-origin absolute path, or the landing path.
///
/// Protocol-relative (`//host`) and backslash forms are rejected, and so are
/// auth pages, which would bounce a signed-in visitor straight back.
#[must_use]
pub fn sanitize_callback(raw: Option<&str>, paths: &GatePaths) -> String {
    match raw.map(str::trim) {
        Some(target)
            if target.starts_with('/')
                && !target.starts_with("//")
                && !target.contains('\\')
                && RouteZone::classify(target) != RouteZone::Auth =>
        {
            target.to_owned()
        }
        _ => paths.landing.to_owned(),
    }
}

/// Decoded value of `param` in a raw query string.
#[must_use]
pub fn callback_from_query(query: Option<&str>, param: &str) -> Option<String> {
    query?
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == param)
        .and_then(|(_, value)| urlencoding::decode(value).ok())
        .map(Cow::into_owned)
}

/// Re-run `guard` on every published snapshot and call `navigate` once per
/// distinct redirect target. The task ends when the store is dropped.
pub fn install_guard<G, N>(mut rx: watch::Receiver<AuthState>, guard: G, navigate: N) -> JoinHandle<()>
where
    G: Fn(&AuthState) -> Access + Send + 'static,
    N: Fn(&str) + Send + 'static,
{
    tokio::spawn(async move {
        let mut last_target: Option<String> = None;
        loop {
            let access = guard(&rx.borrow_and_update());
            match access {
                Access::Redirect(target) => {
                    if last_target.as_deref() != Some(target.as_str()) {
                        tracing::debug!(%target, "page guard redirect");
                        navigate(&target);
                        last_target = Some(target);
                    }
                }
                Access::Granted | Access::Pending => last_target = None,
            }
            if rx.changed().await.is_err() {
                break;
            }
        }
    })
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
