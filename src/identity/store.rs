//! Identity state store.
//!
//! DESIGN
//! ======
//! One observer task per store drains the backend's notification stream and
//! runs [`StoreInner::apply`] for each event. `apply` is the only place the
//! identity and role change, and it writes the summary cookie before the new
//! snapshot is published, so anything a subscriber does in reaction (such as
//! a post-sign-in navigation) already sees the new cookie.
//!
//! `sign_in` / `sign_up` / `sign_out` never set the identity themselves: they
//! call the backend and then wait until the observer has committed the
//! matching snapshot. When they return, the cookie is in place.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;

use super::backend::{IdentityBackend, IdentityEvent};
use super::cookie::SummaryWriter;
use super::error::{AuthError, ObserverError};
use super::types::{AdminAllowList, AuthState, Credential};
use crate::gate::summary::SessionSummary;

#[derive(Clone)]
pub struct IdentityStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    backend: Arc<dyn IdentityBackend>,
    allow_list: AdminAllowList,
    writer: Arc<dyn SummaryWriter>,
    state: watch::Sender<AuthState>,
    /// Set once the notification stream has ended.
    observer_closed: AtomicBool,
}

impl StoreInner {
    fn apply(&self, event: IdentityEvent) {
        let identity = match event {
            Ok(identity) => identity,
            Err(e) => {
                tracing::warn!(error = %e, "identity observer failed; treating as signed out");
                None
            }
        };
        let role = self.allow_list.role_for(identity.as_ref());

        // Cookie first: the gate must never see an older value than subscribers do.
        self.writer
            .write(SessionSummary { authenticated: identity.is_some() });

        tracing::debug!(
            signed_in = identity.is_some(),
            ?role,
            uid = identity.as_ref().map(|i| i.uid.as_str()),
            "identity state applied"
        );
        self.state
            .send_replace(AuthState { identity, role, loading: false });
    }
}

impl IdentityStore {
    /// Subscribe to `backend` and spawn the observer task.
    ///
    /// Must be called from within a Tokio runtime. The returned store reports
    /// `loading = true` until the backend delivers its first identity.
    pub fn start(
        backend: Arc<dyn IdentityBackend>,
        allow_list: AdminAllowList,
        writer: Arc<dyn SummaryWriter>,
    ) -> Self {
        let (state, _) = watch::channel(AuthState::loading());
        let mut events = backend.subscribe();
        let inner = Arc::new(StoreInner {
            backend,
            allow_list,
            writer,
            state,
            observer_closed: AtomicBool::new(false),
        });

        let observer = Arc::clone(&inner);
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                observer.apply(event);
            }
            observer.observer_closed.store(true, Ordering::Release);
            observer.apply(Err(ObserverError::Closed));
        });

        Self { inner }
    }

    #[must_use]
    pub fn current_state(&self) -> AuthState {
        self.inner.state.borrow().clone()
    }

    /// Receiver that yields every published snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.inner.state.subscribe()
    }

    #[must_use]
    pub fn allow_list(&self) -> &AdminAllowList {
        &self.inner.allow_list
    }

    /// Sign in and return the committed snapshot.
    ///
    /// # Errors
    ///
    /// [`AuthError::Credential`] if the backend rejects the credential (state
    /// untouched), or [`AuthError::ObserverStopped`] if the notification
    /// stream ended before the sign-in was observed.
    pub async fn sign_in(&self, credential: Credential) -> Result<AuthState, AuthError> {
        let mut rx = self.subscribe();
        let identity = self.inner.backend.sign_in(credential).await.map_err(|e| {
            tracing::info!(error = %e, "sign-in rejected");
            e
        })?;
        self.await_commit(&mut rx, |s| s.identity.as_ref().is_some_and(|i| i.uid == identity.uid))
            .await
    }

    /// Register a new account; on success the account is signed in.
    ///
    /// # Errors
    ///
    /// Same as [`IdentityStore::sign_in`].
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthState, AuthError> {
        let mut rx = self.subscribe();
        let identity = self.inner.backend.sign_up(email, password).await.map_err(|e| {
            tracing::info!(error = %e, "sign-up rejected");
            e
        })?;
        self.await_commit(&mut rx, |s| s.identity.as_ref().is_some_and(|i| i.uid == identity.uid))
            .await
    }

    /// # Errors
    ///
    /// Returns [`AuthError::Credential`] if the backend refuses to send the mail.
    pub async fn send_password_reset(&self, email: &str) -> Result<(), AuthError> {
        self.inner.backend.send_password_reset(email).await?;
        Ok(())
    }

    /// Sign out. On failure the observer's last identity and role are kept
    /// and `loading` is cleared, so the UI is not left spinning.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Credential`] if the backend call fails.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        let mut rx = self.subscribe();
        self.inner.state.send_modify(|s| s.loading = true);

        if let Err(e) = self.inner.backend.sign_out().await {
            tracing::warn!(error = %e, "sign-out failed; keeping last known identity");
            self.inner.state.send_modify(|s| s.loading = false);
            return Err(e.into());
        }

        self.await_commit(&mut rx, |s| s.identity.is_none() && !s.loading)
            .await?;
        Ok(())
    }

    async fn await_commit<F>(&self, rx: &mut watch::Receiver<AuthState>, mut committed: F) -> Result<AuthState, AuthError>
    where
        F: FnMut(&AuthState) -> bool,
    {
        let closed = &self.inner.observer_closed;
        let state = rx
            .wait_for(|s| committed(s) || closed.load(Ordering::Acquire))
            .await
            .map_err(|_| AuthError::ObserverStopped)?
            .clone();
        if committed(&state) { Ok(state) } else { Err(AuthError::ObserverStopped) }
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
