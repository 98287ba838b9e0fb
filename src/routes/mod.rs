//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every request, API or static page, passes through the request gate first.
//! The static site under `WEBSITE_DIR` is the fallback service, so
//! `/dashboard/...` and `/admin/...` pages are only served once the gate has
//! let them through.

pub mod auth;

use std::path::Path;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::gate::request_gate;
use crate::state::AppState;

#[must_use]
pub fn app(state: AppState, website_dir: &Path) -> Router {
    let gate = axum::middleware::from_fn_with_state(state.gate_paths, request_gate);
    let website = ServeDir::new(website_dir).append_index_html_on_directories(true);

    Router::new()
        .route("/api/auth/config", get(auth::config_status))
        .route("/api/auth/error", get(auth::error_details))
        .route(
            "/api/auth/verify-email",
            get(auth::verify_email_link).post(auth::verify_email_submit),
        )
        .route("/healthz", get(healthz))
        .fallback_service(website)
        .layer(gate)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
