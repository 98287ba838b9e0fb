//! Identity state store and the pieces around it.
//!
//! SYSTEM CONTEXT
//! ==============
//! This is the client-resident half of the session gate. The store is the
//! only component allowed to say "signed in" with confidence, because it
//! alone listens to the identity backend. Every transition it observes is
//! mirrored into the `fb-authed` summary cookie that the edge
//! [`crate::gate`] reads on the next navigation.
//!
//! ARCHITECTURE
//! ============
//! - [`backend`]: the async seam to the identity backend plus the change
//!   notification stream.
//! - [`firebase`]: REST implementation of that seam.
//! - [`store`]: observer loop, role derivation, cookie write, snapshots.
//! - [`service`]: configured / unconfigured wrapper handed to the client app.
//! - [`guard`]: second-tier page checks run once the store has settled.

pub mod backend;
pub mod cookie;
pub mod error;
pub mod firebase;
pub mod guard;
pub mod service;
pub mod store;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::{EmailVerifier, IdentityBackend, IdentityEvent, IdentityEvents};
pub use cookie::{CookieMirror, SummaryWriter};
pub use error::{AuthError, CredentialError, ObserverError};
pub use service::IdentityService;
pub use store::IdentityStore;
pub use types::{AdminAllowList, AuthState, Credential, Identity, IdpProvider, Role};
