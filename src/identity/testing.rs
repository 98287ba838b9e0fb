//! In-process identity backend used by tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use super::backend::{EmailVerifier, IdentityBackend, IdentityEvents, Subscribers};
use super::cookie::CookieMirror;
use super::error::{CredentialError, ObserverError};
use super::store::IdentityStore;
use super::types::{AdminAllowList, Credential, Identity};

pub(crate) const ADMIN_EMAIL: &str = "owner@school.test";
pub(crate) const STUDENT_EMAIL: &str = "student@school.test";
pub(crate) const PASSWORD: &str = "correct horse";

#[must_use]
pub(crate) fn identity_for(email: &str) -> Identity {
    Identity { uid: format!("uid-{email}"), email: Some(email.to_owned()), display_name: None }
}

/// Backend with a fixed account table. Google tokens of the form
/// `valid:<email>` are accepted.
#[derive(Default)]
pub(crate) struct MockBackend {
    accounts: Mutex<HashMap<String, String>>,
    current: Mutex<Option<Identity>>,
    subscribers: Subscribers,
    fail_sign_out: AtomicBool,
    resets_sent: AtomicUsize,
}

impl MockBackend {
    #[must_use]
    pub(crate) fn with_account(self, email: &str, password: &str) -> Self {
        self.lock_accounts()
            .insert(email.to_owned(), password.to_owned());
        self
    }

    pub(crate) fn fail_sign_out(&self, fail: bool) {
        self.fail_sign_out.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn resets_sent(&self) -> usize {
        self.resets_sent.load(Ordering::SeqCst)
    }

    /// Session revoked out-of-band.
    pub(crate) fn revoke(&self) {
        let mut current = self.lock_current();
        *current = None;
        self.subscribers.publish(&Ok(None));
    }

    /// Re-send the current identity without changing it.
    pub(crate) fn repeat_current(&self) {
        let current = self.lock_current();
        self.subscribers.publish(&Ok(current.clone()));
    }

    pub(crate) fn fail_stream(&self, message: &str) {
        self.subscribers
            .publish(&Err(ObserverError::Stream(message.to_owned())));
    }

    pub(crate) fn close_streams(&self) {
        self.subscribers.close_all();
    }

    fn establish(&self, identity: Identity) -> Identity {
        let mut current = self.lock_current();
        *current = Some(identity.clone());
        self.subscribers.publish(&Ok(Some(identity.clone())));
        identity
    }

    fn lock_accounts(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.accounts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_current(&self) -> std::sync::MutexGuard<'_, Option<Identity>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait::async_trait]
impl IdentityBackend for MockBackend {
    fn subscribe(&self) -> IdentityEvents {
        let current = self.lock_current();
        self.subscribers.add(Ok(current.clone()))
    }

    async fn sign_in(&self, credential: Credential) -> Result<Identity, CredentialError> {
        let email = match credential {
            Credential::EmailPassword { email, password } => {
                match self.lock_accounts().get(&email) {
                    None => return Err(CredentialError::UnknownAccount),
                    Some(stored) if *stored != password => return Err(CredentialError::InvalidCredentials),
                    Some(_) => email,
                }
            }
            Credential::IdpToken { id_token, .. } => id_token
                .strip_prefix("valid:")
                .map(str::to_owned)
                .ok_or(CredentialError::InvalidIdpResponse)?,
        };
        Ok(self.establish(identity_for(&email)))
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, CredentialError> {
        if password.len() < 6 {
            return Err(CredentialError::WeakPassword("Password should be at least 6 characters".into()));
        }
        {
            let mut accounts = self.lock_accounts();
            if accounts.contains_key(email) {
                return Err(CredentialError::EmailInUse);
            }
            accounts.insert(email.to_owned(), password.to_owned());
        }
        Ok(self.establish(identity_for(email)))
    }

    async fn sign_out(&self) -> Result<(), CredentialError> {
        // A real backend awaits the network here; let the observer run.
        tokio::task::yield_now().await;
        if self.fail_sign_out.load(Ordering::SeqCst) {
            return Err(CredentialError::Network("connection reset".into()));
        }
        self.revoke();
        Ok(())
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), CredentialError> {
        if !self.lock_accounts().contains_key(email) {
            return Err(CredentialError::UnknownAccount);
        }
        self.resets_sent.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Accepts [`VALID_OOB_CODE`], fails [`BROKEN_OOB_CODE`] with a network
/// error and treats anything else as expired.
#[derive(Default)]
pub(crate) struct MockVerifier {
    confirmed: AtomicUsize,
}

pub(crate) const VALID_OOB_CODE: &str = "oob-valid";
pub(crate) const BROKEN_OOB_CODE: &str = "oob-broken";

impl MockVerifier {
    pub(crate) fn confirmed(&self) -> usize {
        self.confirmed.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl EmailVerifier for MockVerifier {
    async fn confirm_email(&self, oob_code: &str) -> Result<(), CredentialError> {
        match oob_code {
            VALID_OOB_CODE => {
                self.confirmed.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
            BROKEN_OOB_CODE => Err(CredentialError::Network("connection reset".into())),
            _ => Err(CredentialError::InvalidActionCode),
        }
    }
}

/// Mock backend with one admin and one student account.
#[must_use]
pub(crate) fn school_backend() -> Arc<MockBackend> {
    Arc::new(
        MockBackend::default()
            .with_account(ADMIN_EMAIL, PASSWORD)
            .with_account(STUDENT_EMAIL, PASSWORD),
    )
}

/// Start a store over `backend` with `ADMIN_EMAIL` on the allow-list.
#[must_use]
pub(crate) fn start_store(backend: &Arc<MockBackend>) -> (IdentityStore, Arc<CookieMirror>) {
    let mirror = Arc::new(CookieMirror::new(false));
    let store = IdentityStore::start(backend.clone(), AdminAllowList::new([ADMIN_EMAIL]), mirror.clone());
    (store, mirror)
}

#[must_use]
pub(crate) fn password(email: &str) -> Credential {
    Credential::EmailPassword { email: email.to_owned(), password: PASSWORD.to_owned() }
}
