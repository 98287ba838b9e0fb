//! Axum middleware applying the gate decision table to every request.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;

use super::decision::{GateDecision, GatePaths, decide};
use super::summary::SessionSummary;

/// Mount with `axum::middleware::from_fn_with_state(GatePaths::default(), request_gate)`.
///
/// Reads only the path and the summary cookie. Never writes cookies and never
/// contacts the identity backend.
pub async fn request_gate(State(paths): State<GatePaths>, jar: CookieJar, req: Request, next: Next) -> Response {
    let summary = SessionSummary::from_jar(&jar);
    match decide(req.uri().path(), summary, &paths) {
        GateDecision::Allow => next.run(req).await,
        GateDecision::Redirect(to) => {
            tracing::debug!(
                path = req.uri().path(),
                authenticated = summary.authenticated,
                %to,
                "request gate redirect"
            );
            Redirect::temporary(&to).into_response()
        }
    }
}

#[cfg(test)]
#[path = "middleware_test.rs"]
mod tests;
