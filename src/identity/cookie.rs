//! Writing the session summary cookie.
//!
//! The store calls [`SummaryWriter::write`] synchronously inside its
//! observer callback, before publishing the new snapshot.

use std::sync::{Mutex, PoisonError};

use axum_extra::extract::cookie::Cookie;

use crate::gate::summary::{SUMMARY_COOKIE, SessionSummary};

pub trait SummaryWriter: Send + Sync {
    fn write(&self, summary: SessionSummary);
}

/// In-process cookie store standing in for the browser's jar.
///
/// Keeps the live summary cookie and the `Set-Cookie` string of the last
/// write, and can render the `Cookie` header a follow-up navigation sends.
pub struct CookieMirror {
    secure: bool,
    inner: Mutex<MirrorInner>,
}

#[derive(Default)]
struct MirrorInner {
    live: Option<Cookie<'static>>,
    last_set_cookie: Option<String>,
    writes: usize,
}

impl CookieMirror {
    #[must_use]
    pub fn new(secure: bool) -> Self {
        Self { secure, inner: Mutex::new(MirrorInner::default()) }
    }

    /// `Cookie` request header value, or `None` when no summary cookie is live.
    #[must_use]
    pub fn request_header(&self) -> Option<String> {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner
            .live
            .as_ref()
            .map(|c| format!("{}={}", c.name(), c.value()))
    }

    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        SessionSummary::from_value(
            inner
                .live
                .as_ref()
                .filter(|c| c.name() == SUMMARY_COOKIE)
                .map(Cookie::value),
        )
    }

    #[must_use]
    pub fn last_set_cookie(&self) -> Option<String> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last_set_cookie
            .clone()
    }

    #[must_use]
    pub fn writes(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .writes
    }
}

impl SummaryWriter for CookieMirror {
    fn write(&self, summary: SessionSummary) {
        let cookie = summary.to_cookie(self.secure);
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.last_set_cookie = Some(cookie.to_string());
        inner.live = summary.authenticated.then_some(cookie);
        inner.writes += 1;
    }
}

#[cfg(test)]
#[path = "cookie_test.rs"]
mod tests;
