//! Configured-or-not wrapper around the identity store.
//!
//! Callers receive an [`IdentityService`] and handle the unconfigured case
//! through the enum instead of checking for a missing backend in every
//! method. An unconfigured service behaves as "settled, signed out" and
//! refuses every operation with [`AuthError::Configuration`].

use std::sync::Arc;

use tokio::sync::watch;

use super::backend::IdentityBackend;
use super::cookie::SummaryWriter;
use super::error::AuthError;
use super::firebase::FirebaseBackend;
use super::store::IdentityStore;
use super::types::{AdminAllowList, AuthState, Credential};
use crate::config::{ConfigError, IdentityConfig};
use crate::gate::summary::SessionSummary;

pub enum IdentityService {
    Ready(IdentityStore),
    Unconfigured(Unconfigured),
}

pub struct Unconfigured {
    error: ConfigError,
    state: watch::Sender<AuthState>,
}

impl Unconfigured {
    fn new(error: ConfigError, writer: &dyn SummaryWriter) -> Self {
        tracing::warn!(error = %error, "identity backend not configured; treating every visitor as signed out");
        writer.write(SessionSummary::SIGNED_OUT);
        let (state, _) = watch::channel(AuthState::signed_out());
        Self { error, state }
    }

    #[must_use]
    pub fn error(&self) -> &ConfigError {
        &self.error
    }
}

impl IdentityService {
    /// Build against the Firebase REST backend, or the unconfigured variant.
    pub fn from_config(
        config: Result<IdentityConfig, ConfigError>,
        allow_list: AdminAllowList,
        writer: Arc<dyn SummaryWriter>,
    ) -> Self {
        Self::with_backend(config, allow_list, writer, |cfg| -> Arc<dyn IdentityBackend> {
            Arc::new(FirebaseBackend::new(cfg))
        })
    }

    pub fn with_backend<F>(
        config: Result<IdentityConfig, ConfigError>,
        allow_list: AdminAllowList,
        writer: Arc<dyn SummaryWriter>,
        make_backend: F,
    ) -> Self
    where
        F: FnOnce(IdentityConfig) -> Arc<dyn IdentityBackend>,
    {
        match config {
            Ok(cfg) => {
                tracing::info!(project = %cfg.project_id, admins = allow_list.len(), "identity backend configured");
                Self::Ready(IdentityStore::start(make_backend(cfg), allow_list, writer))
            }
            Err(e) => Self::Unconfigured(Unconfigured::new(e, writer.as_ref())),
        }
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Settings named by the configuration error; empty once configured.
    #[must_use]
    pub fn missing_settings(&self) -> &[&'static str] {
        match self {
            Self::Unconfigured(Unconfigured { error: ConfigError::MissingIdentity { missing }, .. }) => missing,
            _ => &[],
        }
    }

    #[must_use]
    pub fn store(&self) -> Option<&IdentityStore> {
        match self {
            Self::Ready(store) => Some(store),
            Self::Unconfigured(_) => None,
        }
    }

    #[must_use]
    pub fn current_state(&self) -> AuthState {
        match self {
            Self::Ready(store) => store.current_state(),
            Self::Unconfigured(u) => u.state.borrow().clone(),
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        match self {
            Self::Ready(store) => store.subscribe(),
            Self::Unconfigured(u) => u.state.subscribe(),
        }
    }

    /// # Errors
    ///
    /// See [`IdentityStore::sign_in`]; unconfigured services return [`AuthError::Configuration`].
    pub async fn sign_in(&self, credential: Credential) -> Result<AuthState, AuthError> {
        match self {
            Self::Ready(store) => store.sign_in(credential).await,
            Self::Unconfigured(u) => Err(u.error.clone().into()),
        }
    }

    /// # Errors
    ///
    /// See [`IdentityStore::sign_up`]; unconfigured services return [`AuthError::Configuration`].
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthState, AuthError> {
        match self {
            Self::Ready(store) => store.sign_up(email, password).await,
            Self::Unconfigured(u) => Err(u.error.clone().into()),
        }
    }

    /// # Errors
    ///
    /// See [`IdentityStore::sign_out`]; unconfigured services return [`AuthError::Configuration`].
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        match self {
            Self::Ready(store) => store.sign_out().await,
            Self::Unconfigured(u) => Err(u.error.clone().into()),
        }
    }

    /// # Errors
    ///
    /// See [`IdentityStore::send_password_reset`]; unconfigured services return [`AuthError::Configuration`].
    pub async fn send_password_reset(&self, email: &str) -> Result<(), AuthError> {
        match self {
            Self::Ready(store) => store.send_password_reset(email).await,
            Self::Unconfigured(u) => Err(u.error.clone().into()),
        }
    }
}

#[cfg(test)]
#[path = "service_test.rs"]
mod tests;
