//! Session summary cookie: the lossy boolean mirror of the live identity.
//!
//! The identity store is the only writer; the request gate only reads.
//! Exactly `"true"` means signed in. Absent, `"false"` or anything else
//! reads as signed out, so a mangled cookie fails closed.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

pub const SUMMARY_COOKIE: &str = "fb-authed";
pub const SUMMARY_MAX_AGE: Duration = Duration::days(30);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub authenticated: bool,
}

impl SessionSummary {
    pub const SIGNED_IN: Self = Self { authenticated: true };
    pub const SIGNED_OUT: Self = Self { authenticated: false };

    #[must_use]
    pub fn from_value(value: Option<&str>) -> Self {
        Self { authenticated: value == Some("true") }
    }

    #[must_use]
    pub fn from_jar(jar: &CookieJar) -> Self {
        Self::from_value(jar.get(SUMMARY_COOKIE).map(Cookie::value))
    }

    /// Cookie to write for this summary.
    ///
    /// Signed in: `true` with a 30 day max-age. Signed out: `false` with a
    /// zero max-age, which deletes it. Not `HttpOnly`: the client writes it.
    #[must_use]
    pub fn to_cookie(self, secure: bool) -> Cookie<'static> {
        let (value, max_age) = if self.authenticated {
            ("true", SUMMARY_MAX_AGE)
        } else {
            ("false", Duration::ZERO)
        };
        Cookie::build((SUMMARY_COOKIE, value))
            .path("/")
            .same_site(SameSite::Lax)
            .secure(secure)
            .max_age(max_age)
            .build()
    }
}

#[cfg(test)]
#[path = "summary_test.rs"]
mod tests;
