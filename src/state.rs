//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. The
//! edge server holds no per-visitor identity: sign-in state lives in the
//! client-side store, and the gate only reads the summary cookie. What the
//! server keeps is the identity backend's configuration status and an
//! optional e-mail verifier, which needs no session.

use std::sync::Arc;

use serde::Serialize;

use crate::config::{ConfigError, IdentityConfig};
use crate::gate::GatePaths;
use crate::identity::EmailVerifier;

/// Identity backend configuration as reported by `/api/auth/config`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IdentityStatus {
    pub configured: bool,
    /// Configured and the REST base URL is a usable http(s) URL.
    pub ready: bool,
    pub missing: Vec<&'static str>,
}

impl IdentityStatus {
    #[must_use]
    pub fn from_config(config: &Result<IdentityConfig, ConfigError>) -> Self {
        match config {
            Ok(cfg) => Self {
                configured: true,
                ready: reqwest::Url::parse(&cfg.toolkit_url)
                    .is_ok_and(|url| matches!(url.scheme(), "http" | "https")),
                missing: Vec::new(),
            },
            Err(ConfigError::MissingIdentity { missing }) => {
                Self { configured: false, ready: false, missing: missing.clone() }
            }
            Err(ConfigError::Invalid { .. }) => Self::default(),
        }
    }
}

/// Clone is required by Axum; the verifier is shared behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub gate_paths: GatePaths,
    pub identity: IdentityStatus,
    /// `None` if the identity backend is not configured.
    pub verifier: Option<Arc<dyn EmailVerifier>>,
}

impl AppState {
    #[must_use]
    pub fn new(identity: IdentityStatus, verifier: Option<Arc<dyn EmailVerifier>>) -> Self {
        Self { gate_paths: GatePaths::default(), identity, verifier }
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
