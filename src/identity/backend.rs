//! Identity backend seam.
//!
//! CONTRACT
//! ========
//! - `subscribe` returns a stream whose first item is the identity at the
//!   moment of subscription, followed by one item per later change.
//! - A successful `sign_in`, `sign_up` or `sign_out` publishes a change on
//!   every live stream before the call returns.
//! - The backend knows nothing about roles.

use std::sync::{Mutex, PoisonError};

use tokio::sync::mpsc;

use super::error::{CredentialError, ObserverError};
use super::types::{Credential, Identity};

/// One notification: the new identity, or a failure of the stream itself.
pub type IdentityEvent = Result<Option<Identity>, ObserverError>;
pub type IdentityEvents = mpsc::UnboundedReceiver<IdentityEvent>;

#[async_trait::async_trait]
pub trait IdentityBackend: Send + Sync {
    fn subscribe(&self) -> IdentityEvents;

    async fn sign_in(&self, credential: Credential) -> Result<Identity, CredentialError>;

    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, CredentialError>;

    async fn sign_out(&self) -> Result<(), CredentialError>;

    async fn send_password_reset(&self, email: &str) -> Result<(), CredentialError>;
}

/// Confirms the out-of-band code from an e-mail verification link.
///
/// Needs no signed-in session, so the edge server can hold one for every visitor.
#[async_trait::async_trait]
pub trait EmailVerifier: Send + Sync {
    async fn confirm_email(&self, oob_code: &str) -> Result<(), CredentialError>;
}

// =============================================================================
// SUBSCRIBER FAN-OUT
// =============================================================================

/// Live notification streams held by a backend implementation.
#[derive(Default)]
pub struct Subscribers {
    senders: Mutex<Vec<mpsc::UnboundedSender<IdentityEvent>>>,
}

impl Subscribers {
    /// Register a new stream primed with `initial`.
    pub fn add(&self, initial: IdentityEvent) -> IdentityEvents {
        let (tx, rx) = mpsc::unbounded_channel();
        // Receiver is still in hand, so the first send cannot fail.
        let _ = tx.send(initial);
        self.senders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }

    /// Deliver `event` to every live stream, dropping closed ones.
    pub fn publish(&self, event: &IdentityEvent) {
        self.senders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Drop every stream; receivers see the stream end.
    pub fn close_all(&self) {
        self.senders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.senders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "backend_test.rs"]
mod tests;
